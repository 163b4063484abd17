//! JSON encoding of generated types.

use ldapgen_fixtures::{Account, Group, MailUser};
use ldapgen_runtime::Item;
use serde_json::json;

fn group() -> Group {
    let mut group = Group::new("cn=staff,ou=groups,dc=example,dc=com");
    group.is_posix_group = true;
    group.cn = vec!["staff".into()];
    group.gid_number = "50".into();
    group
}

#[test]
fn test_empty_attributes_are_skipped() {
    let value = serde_json::to_value(group()).unwrap();
    assert_eq!(
        value,
        json!({
            "is_posix_group": true,
            "cn": ["staff"],
            "gidNumber": "50",
        })
    );
}

#[test]
fn test_attribute_names_are_ldap_names() {
    let mut user = MailUser::new("");
    user.mail_quota = "1024".into();
    user.mail_forwarding_address = vec!["a@example.com".into()];

    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["mailQuota"], "1024");
    assert_eq!(value["mailForwardingAddress"], json!(["a@example.com"]));
    assert!(value.get("mail_quota").is_none());
    assert!(value.get("mail").is_none());
    assert_eq!(value["is_person"], false);
}

#[test]
fn test_dn_is_not_serialized() {
    let text = serde_json::to_string(&group()).unwrap();
    assert!(!text.contains("dc=example"), "{text}");

    let back: Group = serde_json::from_str(&text).unwrap();
    assert_eq!(back.dn(), "");
    assert_eq!(back.cn, ["staff"]);
    assert_eq!(back.gid_number, "50");
}

#[test]
fn test_missing_fields_default() {
    let account: Account = serde_json::from_value(json!({
        "is_posix_account": true,
        "uid": ["jdoe"],
        "uidNumber": "1000",
    }))
    .unwrap();
    assert!(account.is_posix_account);
    assert_eq!(account.uid, ["jdoe"]);
    assert_eq!(account.uid_number, "1000");
    assert!(account.cn.is_empty());
    assert_eq!(account.home_directory, "");
    assert_eq!(account.dn(), "uid=jdoe,ou=people,dc=example,dc=com");
}

#[test]
fn test_json_round_trip() {
    let mut group = group();
    group.member_uid = vec!["jdoe".into(), "asmith".into()];
    group.set_dn("");

    let text = serde_json::to_string(&group).unwrap();
    let back: Group = serde_json::from_str(&text).unwrap();
    assert_eq!(back, group);
}

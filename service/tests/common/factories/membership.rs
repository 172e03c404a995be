#![allow(dead_code)]

use serde_json::{json, Value};

/// Membership with an embedded user id and no name fields.
pub fn bare_membership(i: usize) -> Value {
    json!({
        "id": format!("mem_{i:08}"),
        "status": "active",
        "user": { "id": format!("user_{i}") }
    })
}

/// Membership whose user carries a username and email.
pub fn named_membership(i: usize, username: &str) -> Value {
    json!({
        "id": format!("mem_{i:08}"),
        "status": "active",
        "user": {
            "id": format!("user_{i}"),
            "username": username,
            "email": format!("{username}@example.com")
        }
    })
}

/// Memberships endpoint payload for `records`; `next` becomes
/// `pagination.next_page`.
pub fn membership_page(records: Vec<Value>, next: Option<u32>) -> Value {
    json!({
        "data": records,
        "pagination": { "next_page": next }
    })
}

/// Members endpoint record.
pub fn member_profile(user_id: &str, display_name: &str) -> Value {
    json!({
        "user_id": user_id,
        "display_name": display_name
    })
}

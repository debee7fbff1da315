//! Order attribution: ties a guest order to the session user who placed it.

use sf_01_session_auth::IdentityContext;
use sf_02_commerce_gateway::{Address, OrderCreateRequest};

pub const META_USER_ID: &str = "_telegram_user_id";
pub const META_USERNAME: &str = "_telegram_username";
pub const META_START_PARAM: &str = "_telegram_start_param";

/// Record the acting user on the order.
///
/// Adds user metadata entries. When the order has no billing fragment, one is
/// created from the user's name so the operator can address the customer.
pub fn attribute_order(
    mut order: OrderCreateRequest,
    identity: &IdentityContext,
) -> OrderCreateRequest {
    let user = &identity.user;
    order = order.meta(META_USER_ID, user.id);
    if let Some(username) = user.username.as_deref().filter(|u| !u.is_empty()) {
        order = order.meta(META_USERNAME, username);
    }
    if let Some(start_param) = identity.start_param() {
        order = order.meta(META_START_PARAM, start_param);
    }

    if order.billing.is_none() {
        if let Some(first_name) = user.first_name.clone() {
            order.billing = Some(Address::default().name(first_name, user.last_name.clone()));
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sf_01_session_auth::{parse_payload, SessionUser};
    use sf_02_commerce_gateway::LineItem;

    fn identity(payload: &str) -> IdentityContext {
        let claims = parse_payload(payload);
        let user = claims.user().unwrap();
        IdentityContext { user, claims }
    }

    #[test]
    fn test_user_metadata_added() {
        let identity = identity(
            "user=%7B%22id%22%3A42%2C%22first_name%22%3A%22Ann%22%2C%22username%22%3A%22ann%22%7D&start_param=promo7",
        );
        let order = attribute_order(OrderCreateRequest::new(vec![LineItem::new(1, 1)]), &identity);

        let meta: Vec<_> = order
            .meta_data
            .iter()
            .map(|m| (m.key.as_str(), m.value.clone()))
            .collect();
        assert_eq!(
            meta,
            vec![
                (META_USER_ID, json!(42)),
                (META_USERNAME, json!("ann")),
                (META_START_PARAM, json!("promo7")),
            ]
        );
        let billing = order.billing.unwrap();
        assert_eq!(billing.first_name.as_deref(), Some("Ann"));
        assert_eq!(billing.last_name, None);
    }

    #[test]
    fn test_existing_billing_kept() {
        let identity = IdentityContext {
            user: SessionUser {
                id: 7,
                first_name: Some("Bo".to_string()),
                last_name: None,
                username: None,
                language_code: None,
                is_premium: None,
                allows_write_to_pm: None,
                photo_url: None,
            },
            claims: parse_payload("auth_date=1"),
        };
        let order = OrderCreateRequest::new(vec![LineItem::new(1, 1)])
            .billing(Address::default().email("bo@example.com"));
        let order = attribute_order(order, &identity);

        assert_eq!(order.meta_data.len(), 1);
        let billing = order.billing.unwrap();
        assert_eq!(billing.email.as_deref(), Some("bo@example.com"));
        assert_eq!(billing.first_name, None);
    }
}

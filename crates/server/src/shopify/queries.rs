//! GraphQL operation definitions for the Shopify Admin API.
//!
//! Each operation is a marker type implementing
//! [`graphql_client::GraphQLQuery`], with its `Variables` and `ResponseData`
//! in a snake_case module of the same name. Documents live in
//! `graphql/queries/*.graphql`; a document may hold several operations, and
//! the operation name selects which one Shopify executes.

use graphql_client::GraphQLQuery;
use metasync_core::CustomerId;
use serde::{Deserialize, Serialize};

const CUSTOMERS_DOCUMENT: &str = include_str!("../../graphql/queries/customers.graphql");
const WEBHOOKS_DOCUMENT: &str = include_str!("../../graphql/queries/webhooks.graphql");

/// Implement `GraphQLQuery` for a marker type backed by a document operation.
macro_rules! operation {
    ($name:ident, $module:ident, $document:expr) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> graphql_client::QueryBody<Self::Variables> {
                graphql_client::QueryBody {
                    variables,
                    query: $document,
                    operation_name: stringify!($name),
                }
            }
        }
    };
}

/// A mutation user error (`field` path plus message).
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Join user errors into a single `field: message; ...` string.
pub fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| {
            let field = e.field.as_ref().map_or_else(String::new, |f| f.join("."));
            format!("{}: {}", field, e.message)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Customer queries
// =============================================================================

operation!(GetCustomerMarketingState, get_customer_marketing_state, CUSTOMERS_DOCUMENT);

pub mod get_customer_marketing_state {
    use super::{CustomerId, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<Customer>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Customer {
        pub id: CustomerId,
        pub email: Option<String>,
        pub email_marketing_consent: Option<EmailMarketingConsent>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EmailMarketingConsent {
        pub marketing_state: Option<String>,
    }
}

operation!(GetCustomers, get_customers, CUSTOMERS_DOCUMENT);

pub mod get_customers {
    use super::{CustomerId, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub after: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customers: CustomerConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomerConnection {
        pub edges: Vec<CustomerEdge>,
        pub page_info: PageInfo,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CustomerEdge {
        pub cursor: String,
        pub node: CustomerNode,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CustomerNode {
        pub id: CustomerId,
        pub email: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PageInfo {
        pub has_next_page: bool,
    }
}

operation!(GetCustomerMetafield, get_customer_metafield, CUSTOMERS_DOCUMENT);

pub mod get_customer_metafield {
    use super::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: String,
        pub namespace: String,
        pub key: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customer: Option<Customer>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Customer {
        pub id: String,
        pub metafield: Option<Metafield>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Metafield {
        pub id: String,
        pub value: String,
    }
}

operation!(CustomerUpdateMetafields, customer_update_metafields, CUSTOMERS_DOCUMENT);

pub mod customer_update_metafields {
    use super::{Deserialize, Serialize, UserError};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CustomerInput,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct CustomerInput {
        pub id: String,
        pub metafields: Vec<MetafieldInput>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct MetafieldInput {
        pub namespace: String,
        pub key: String,
        pub value: String,
        #[serde(rename = "type")]
        pub type_: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_update: Option<CustomerUpdatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomerUpdatePayload {
        pub customer: Option<UpdatedCustomer>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct UpdatedCustomer {
        pub id: String,
    }
}

// =============================================================================
// Webhook subscriptions
// =============================================================================

operation!(GetWebhookSubscriptions, get_webhook_subscriptions, WEBHOOKS_DOCUMENT);

pub mod get_webhook_subscriptions {
    use super::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        pub topics: Option<Vec<String>>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub webhook_subscriptions: WebhookSubscriptionConnection,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct WebhookSubscriptionConnection {
        pub edges: Vec<WebhookSubscriptionEdge>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct WebhookSubscriptionEdge {
        pub node: WebhookSubscriptionNode,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct WebhookSubscriptionNode {
        pub id: String,
        pub topic: String,
        pub endpoint: Option<Endpoint>,
    }

    /// Union of endpoint kinds; only HTTP endpoints carry a callback URL.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Endpoint {
        #[serde(rename = "__typename")]
        pub typename: String,
        #[serde(default)]
        pub callback_url: Option<String>,
    }
}

operation!(WebhookSubscriptionCreate, webhook_subscription_create, WEBHOOKS_DOCUMENT);

pub mod webhook_subscription_create {
    use super::{Deserialize, Serialize, UserError};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub topic: String,
        pub webhook_subscription: WebhookSubscriptionInput,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WebhookSubscriptionInput {
        pub callback_url: String,
        pub format: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub webhook_subscription_create: Option<WebhookSubscriptionCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WebhookSubscriptionCreatePayload {
        pub webhook_subscription: Option<CreatedSubscription>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CreatedSubscription {
        pub id: String,
    }
}

//! Customer reads and metafield writes.

use metasync_core::{CustomerId, MarketingState};
use tracing::instrument;

use super::queries::{
    CustomerUpdateMetafields, GetCustomerMarketingState, GetCustomerMetafield, GetCustomers,
    format_user_errors,
};
use super::{
    AdminClient, CustomerConsent, CustomerEdge, CustomerPage, CustomerSummary, Metafield,
    MetafieldInput, ShopifyError,
};

impl AdminClient {
    /// Get a customer's email marketing consent.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the customer does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get_customer_consent(&self, id: CustomerId) -> Result<CustomerConsent, ShopifyError> {
        let variables = super::queries::get_customer_marketing_state::Variables { id: id.to_gid() };

        let response = self.execute::<GetCustomerMarketingState>(variables).await?;
        let customer = response
            .customer
            .ok_or_else(|| ShopifyError::NotFound(format!("customer {id}")))?;

        Ok(CustomerConsent {
            id: customer.id,
            email: customer.email,
            marketing_state: customer
                .email_marketing_consent
                .and_then(|consent| consent.marketing_state)
                .filter(|state| !state.trim().is_empty())
                .map(MarketingState::from),
        })
    }

    /// Get one page of customers.
    ///
    /// # Arguments
    ///
    /// * `first` - Page size (Shopify caps this at 250)
    /// * `after` - Cursor of the last customer on the previous page
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn get_customers(
        &self,
        first: i64,
        after: Option<String>,
    ) -> Result<CustomerPage, ShopifyError> {
        let variables = super::queries::get_customers::Variables { first, after };

        let response = self.execute::<GetCustomers>(variables).await?;
        let connection = response.customers;

        Ok(CustomerPage {
            edges: connection
                .edges
                .into_iter()
                .map(|edge| CustomerEdge {
                    cursor: edge.cursor,
                    customer: CustomerSummary {
                        id: edge.node.id,
                        email: edge.node.email,
                    },
                })
                .collect(),
            has_next_page: connection.page_info.has_next_page,
        })
    }

    /// Get a single customer metafield.
    ///
    /// Returns `None` when the customer exists but has no value under
    /// `namespace.key`.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the customer does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(customer_id = %customer))]
    pub async fn get_customer_metafield(
        &self,
        customer: CustomerId,
        namespace: &str,
        key: &str,
    ) -> Result<Option<Metafield>, ShopifyError> {
        let variables = super::queries::get_customer_metafield::Variables {
            id: customer.to_gid(),
            namespace: namespace.to_string(),
            key: key.to_string(),
        };

        let response = self.execute::<GetCustomerMetafield>(variables).await?;
        let found = response
            .customer
            .ok_or_else(|| ShopifyError::NotFound(format!("customer {customer}")))?;

        Ok(found.metafield.map(|m| Metafield {
            id: m.id,
            value: m.value,
        }))
    }

    /// Create or overwrite a customer metafield.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` if Shopify rejects the input, or
    /// another error if the API request fails.
    #[instrument(
        skip(self, metafield),
        fields(customer_id = %customer, namespace = %metafield.namespace, key = %metafield.key)
    )]
    pub async fn set_customer_metafield(
        &self,
        customer: CustomerId,
        metafield: MetafieldInput,
    ) -> Result<(), ShopifyError> {
        use super::queries::customer_update_metafields::{
            CustomerInput, MetafieldInput as GqlMetafieldInput, Variables,
        };

        let variables = Variables {
            input: CustomerInput {
                id: customer.to_gid(),
                metafields: vec![GqlMetafieldInput {
                    namespace: metafield.namespace,
                    key: metafield.key,
                    value: metafield.value,
                    type_: metafield.type_,
                }],
            },
        };

        let response = self.execute::<CustomerUpdateMetafields>(variables).await?;

        let payload = response.customer_update.ok_or_else(|| {
            ShopifyError::UserError("customerUpdate returned no payload".to_string())
        })?;

        if !payload.user_errors.is_empty() {
            return Err(ShopifyError::UserError(format_user_errors(
                &payload.user_errors,
            )));
        }

        if payload.customer.is_none() {
            return Err(ShopifyError::NotFound(format!("customer {customer}")));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::test_support::{GRAPHQL_PATH, test_client};

    #[tokio::test]
    async fn test_get_customer_consent_reads_state() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "operationName": "GetCustomerMarketingState",
                "variables": { "id": "gid://shopify/Customer/7" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "customer": {
                        "id": "gid://shopify/Customer/7",
                        "email": "ada@example.com",
                        "emailMarketingConsent": { "marketingState": "SUBSCRIBED" }
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let consent = test_client(&server)
            .get_customer_consent(CustomerId::new(7))
            .await
            .unwrap();

        assert_eq!(consent.id, CustomerId::new(7));
        assert_eq!(consent.email.as_deref(), Some("ada@example.com"));
        assert_eq!(consent.marketing_state, Some(MarketingState::Subscribed));
    }

    #[tokio::test]
    async fn test_get_customer_consent_without_consent_record() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "customer": {
                        "id": "gid://shopify/Customer/7",
                        "email": null,
                        "emailMarketingConsent": null
                    }
                }
            })))
            .mount(&server)
            .await;

        let consent = test_client(&server)
            .get_customer_consent(CustomerId::new(7))
            .await
            .unwrap();

        assert_eq!(consent.marketing_state, None);
    }

    #[tokio::test]
    async fn test_get_customer_consent_missing_customer() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "customer": null } })),
            )
            .mount(&server)
            .await;

        let err = test_client(&server)
            .get_customer_consent(CustomerId::new(7))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_customers_maps_page() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "operationName": "GetCustomers",
                "variables": { "first": 2, "after": "c0" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "customers": {
                        "edges": [
                            { "cursor": "c1", "node": { "id": "gid://shopify/Customer/1", "email": "a@example.com" } },
                            { "cursor": "c2", "node": { "id": "gid://shopify/Customer/2", "email": null } }
                        ],
                        "pageInfo": { "hasNextPage": true }
                    }
                }
            })))
            .mount(&server)
            .await;

        let page = test_client(&server)
            .get_customers(2, Some("c0".to_string()))
            .await
            .unwrap();

        assert_eq!(page.edges.len(), 2);
        assert_eq!(page.edges[1].customer.id, CustomerId::new(2));
        assert!(page.has_next_page);
        assert_eq!(page.last_cursor(), Some("c2"));
    }

    #[tokio::test]
    async fn test_get_customer_metafield_absent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "variables": { "namespace": "custom", "key": "favorites" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "customer": { "id": "gid://shopify/Customer/3", "metafield": null } }
            })))
            .mount(&server)
            .await;

        let metafield = test_client(&server)
            .get_customer_metafield(CustomerId::new(3), "custom", "favorites")
            .await
            .unwrap();

        assert_eq!(metafield, None);
    }

    #[tokio::test]
    async fn test_set_customer_metafield_sends_input() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({
                "operationName": "CustomerUpdateMetafields",
                "variables": {
                    "input": {
                        "id": "gid://shopify/Customer/9",
                        "metafields": [{
                            "namespace": "custom",
                            "key": "marketing_state",
                            "type": "single_line_text_field",
                            "value": "PENDING"
                        }]
                    }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "customerUpdate": {
                        "customer": { "id": "gid://shopify/Customer/9" },
                        "userErrors": []
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        test_client(&server)
            .set_customer_metafield(
                CustomerId::new(9),
                MetafieldInput::new("custom", "marketing_state", "single_line_text_field", "PENDING"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_set_customer_metafield_user_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "customerUpdate": {
                        "customer": null,
                        "userErrors": [{ "field": ["input", "metafields"], "message": "is invalid" }]
                    }
                }
            })))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .set_customer_metafield(
                CustomerId::new(9),
                MetafieldInput::new("custom", "favorites", "json", "not json"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "User error: input.metafields: is invalid");
    }
}

//! Mock integration clients for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use crate::domain::profile::{SmsCredentials, WhatsAppCredentials};
use crate::integrations::{
    AiModel, GatewayResponse, IntegrationError, PredictionClient, SmsGateway, WhatsAppGateway,
};

mock! {
    pub Predictions {}

    #[async_trait]
    impl PredictionClient for Predictions {
        async fn run(&self, model: AiModel, input: Value) -> Result<Value, IntegrationError>;
    }
}

mock! {
    pub Sms {}

    #[async_trait]
    impl SmsGateway for Sms {
        async fn send_sms(
            &self,
            credentials: &SmsCredentials,
            to: &str,
            text: &str,
        ) -> Result<GatewayResponse, IntegrationError>;
    }
}

mock! {
    pub WhatsApp {}

    #[async_trait]
    impl WhatsAppGateway for WhatsApp {
        async fn send_text(
            &self,
            credentials: &WhatsAppCredentials,
            to: &str,
            body: &str,
        ) -> Result<GatewayResponse, IntegrationError>;
    }
}

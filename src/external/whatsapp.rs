use crate::config::WhatsAppConfig;
use crate::error::{AppError, AppResult};
use crate::external::delivery::DeliveryChannel;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
pub struct TemplateMessage {
    pub messaging_product: &'static str,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub template: Template,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Template {
    pub name: String,
    pub language: Language,
    pub components: Vec<Component>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Language {
    pub code: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<&'static str>,
    pub parameters: Vec<TextParameter>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TextParameter {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

fn text_params(params: &[String]) -> Vec<TextParameter> {
    params
        .iter()
        .map(|p| TextParameter {
            kind: "text",
            text: p.clone(),
        })
        .collect()
}

/// Builds a template message. The URL button component is only added when
/// `button_params` is non-empty, as for copy-code authentication templates.
pub fn build_template_message(
    to: &str,
    template: &str,
    language_code: &str,
    body_params: &[String],
    button_params: &[String],
) -> TemplateMessage {
    let mut components = vec![Component {
        kind: "body",
        sub_type: None,
        index: None,
        parameters: text_params(body_params),
    }];
    if !button_params.is_empty() {
        components.push(Component {
            kind: "button",
            sub_type: Some("url"),
            index: Some("0"),
            parameters: text_params(button_params),
        });
    }

    TemplateMessage {
        messaging_product: "whatsapp",
        to: to.to_string(),
        kind: "template",
        template: Template {
            name: template.to_string(),
            language: Language {
                code: language_code.to_string(),
            },
            components,
        },
    }
}

#[derive(Clone)]
pub struct WhatsAppService {
    client: Client,
    config: WhatsAppConfig,
}

impl WhatsAppService {
    pub fn new(config: WhatsAppConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.phone_number_id
        )
    }
}

#[async_trait]
impl DeliveryChannel for WhatsAppService {
    async fn send(
        &self,
        identifier: &str,
        template: &str,
        body: &[String],
        buttons: &[String],
    ) -> AppResult<()> {
        let message = build_template_message(
            identifier,
            template,
            &self.config.language_code,
            body,
            buttons,
        );

        let response = self
            .client
            .post(self.messages_url())
            .bearer_auth(&self.config.access_token)
            .json(&message)
            .send()
            .await
            .map_err(|e| AppError::DeliveryFailed(format!("WhatsApp request failed: {e}")))?;

        if response.status().is_success() {
            log::info!("WhatsApp template {template} sent to {identifier}");
            Ok(())
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("WhatsApp send failed: {identifier}, HTTP {status}, Error: {error_text}");
            Err(AppError::DeliveryFailed(format!(
                "WhatsApp send failed: HTTP {}",
                status.as_u16()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_message_with_button() {
        let code = vec!["482913".to_string()];
        let msg = build_template_message("+911234567890", "otp_login", "en", &code, &code);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "messaging_product": "whatsapp",
                "to": "+911234567890",
                "type": "template",
                "template": {
                    "name": "otp_login",
                    "language": { "code": "en" },
                    "components": [
                        {
                            "type": "body",
                            "parameters": [{ "type": "text", "text": "482913" }]
                        },
                        {
                            "type": "button",
                            "sub_type": "url",
                            "index": "0",
                            "parameters": [{ "type": "text", "text": "482913" }]
                        }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_template_message_without_button() {
        let msg = build_template_message("+1", "ack", "en", &["a".to_string()], &[]);
        assert_eq!(msg.template.components.len(), 1);
        assert_eq!(msg.template.components[0].kind, "body");
    }

    #[test]
    fn test_messages_url_trims_trailing_slash() {
        let svc = WhatsAppService::new(WhatsAppConfig {
            api_base: "https://graph.example.com/v21.0/".to_string(),
            phone_number_id: "555".to_string(),
            ..WhatsAppConfig::default()
        });
        assert_eq!(svc.messages_url(), "https://graph.example.com/v21.0/555/messages");
    }

    fn stub_graph_api() -> (String, actix_web::dev::ServerHandle) {
        use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};

        let server = HttpServer::new(|| {
            App::new()
                .route(
                    "/ok/messages",
                    web::post().to(|req: HttpRequest, body: web::Json<serde_json::Value>| async move {
                        let authorized = req
                            .headers()
                            .get("Authorization")
                            .and_then(|v| v.to_str().ok())
                            == Some("Bearer tok");
                        if authorized && body["template"]["name"] == "patient_ack" {
                            HttpResponse::Ok().json(json!({ "messages": [{ "id": "wamid.1" }] }))
                        } else {
                            HttpResponse::BadRequest().finish()
                        }
                    }),
                )
                .route(
                    "/down/messages",
                    web::post().to(|| async {
                        HttpResponse::ServiceUnavailable()
                            .json(json!({ "error": { "message": "temporarily unavailable" } }))
                    }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        (format!("http://{addr}"), handle)
    }

    fn service_at(api_base: &str, phone_number_id: &str) -> WhatsAppService {
        WhatsAppService::new(WhatsAppConfig {
            api_base: api_base.to_string(),
            phone_number_id: phone_number_id.to_string(),
            access_token: "tok".to_string(),
            otp_template: "otp_login".to_string(),
            ..WhatsAppConfig::default()
        })
    }

    #[actix_web::test]
    async fn test_send_succeeds_on_2xx() {
        let (base, handle) = stub_graph_api();
        let res = service_at(&base, "ok")
            .send("+911234567890", "patient_ack", &["Asha".to_string()], &[])
            .await;
        handle.stop(false).await;
        assert!(res.is_ok());
    }

    #[actix_web::test]
    async fn test_non_2xx_is_delivery_failed() {
        let (base, handle) = stub_graph_api();
        let err = service_at(&base, "down")
            .send("+911234567890", "otp_login", &["482913".to_string()], &[])
            .await
            .unwrap_err();
        handle.stop(false).await;
        match err {
            AppError::DeliveryFailed(msg) => assert!(msg.contains("503")),
            other => panic!("expected DeliveryFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_api_is_delivery_failed() {
        let err = service_at("http://127.0.0.1:1", "555")
            .send("+911234567890", "otp_login", &[], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DeliveryFailed(_)));
    }
}

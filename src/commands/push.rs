//! Push token and notification commands
//!
//! Boundary operations behind the HTTP routes. Input is validated here before
//! it reaches the store or the dispatcher.

use crate::error::{RelayError, RelayResult};
use crate::push::{
    validate_email, validate_token, AddStatus, DispatchResult, NotificationDispatcher,
    NotificationPayload, RemoveStatus, TokenStore,
};
use serde::{Deserialize, Serialize};

/// Response for listing a user's tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenListResponse {
    pub email: String,
    pub tokens: Vec<String>,
}

/// List the tokens registered for an email
pub fn list_tokens(store: &TokenStore, email: &str) -> RelayResult<TokenListResponse> {
    validate_email(email)?;
    Ok(TokenListResponse {
        email: email.to_string(),
        tokens: store.list_tokens(email),
    })
}

/// Input for registering or removing a token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInput {
    pub email: String,
    pub token: String,
}

/// Response for token registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTokenResponse {
    pub registered: bool,
    pub already_existed: bool,
}

/// Register a push token for an email
pub fn register_token(store: &TokenStore, input: &TokenInput) -> RelayResult<RegisterTokenResponse> {
    validate_email(&input.email)?;
    validate_token(&input.token)?;

    let outcome = store.add_token(&input.email, &input.token);
    if !outcome.committed {
        return Err(RelayError::StorageWrite(format!(
            "Token for {} could not be saved",
            input.email
        )));
    }

    Ok(RegisterTokenResponse {
        registered: true,
        already_existed: outcome.status == AddStatus::AlreadyPresent,
    })
}

/// Response for token removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTokenResponse {
    pub removed: bool,
}

/// Remove a push token from an email
pub fn remove_token(store: &TokenStore, input: &TokenInput) -> RelayResult<RemoveTokenResponse> {
    validate_email(&input.email)?;
    if input.token.is_empty() {
        return Err(RelayError::validation("Token is required"));
    }

    let outcome = store.remove_token(&input.email, &input.token);
    if !outcome.committed {
        return Err(RelayError::StorageWrite(format!(
            "Removal for {} could not be saved",
            input.email
        )));
    }

    Ok(RemoveTokenResponse {
        removed: outcome.status == RemoveStatus::Removed,
    })
}

/// Input for sending a notification directly
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendDirectInput {
    /// Send to every token of this email (optional if token provided)
    #[serde(default)]
    pub email: Option<String>,
    /// Send to this one token (optional if email provided)
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Send a notification to one user or one token.
///
/// Exactly one target is required. Sending to a user prunes the tokens the
/// provider rejected as invalid.
pub async fn send_direct(
    store: &TokenStore,
    dispatcher: &NotificationDispatcher,
    input: SendDirectInput,
) -> RelayResult<DispatchResult> {
    let payload = NotificationPayload::new(input.title, input.body);
    payload.validate()?;

    match (input.email, input.token) {
        (Some(email), None) => {
            validate_email(&email)?;
            let tokens = store.list_tokens(&email);
            if tokens.is_empty() {
                return Err(RelayError::NoTokens(email));
            }

            let result = dispatcher.send(&tokens, &payload).await?;
            if result.failure_count > 0 {
                store.prune_tokens(&email, &result.invalid_tokens());
            }
            Ok(result)
        }
        (None, Some(token)) => {
            validate_token(&token)?;
            dispatcher.send(&[token], &payload).await
        }
        (Some(_), Some(_)) => Err(RelayError::validation(
            "Provide either email or token, not both",
        )),
        (None, None) => Err(RelayError::validation(
            "Either email or token must be provided",
        )),
    }
}

/// Input for the diagnostic echo endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EchoInput {
    #[serde(default)]
    pub mensagem: Option<serde_json::Value>,
}

/// Response for the diagnostic echo endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoResponse {
    pub mensagem: String,
    pub dados: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dados_recebidos: Option<serde_json::Value>,
}

/// Echo back the `mensagem` field, or explain that it is missing.
///
/// Returns `Err` with the 400 body when nothing usable was sent.
pub fn echo(input: EchoInput) -> Result<EchoResponse, EchoResponse> {
    match input.mensagem.filter(is_truthy) {
        Some(mensagem) => {
            log::debug!("Echo request received: {}", mensagem);
            Ok(EchoResponse {
                mensagem: "Dados recebidos com sucesso!".to_string(),
                dados: Some("Ok deu certo".to_string()),
                dados_recebidos: Some(mensagem),
            })
        }
        None => Err(EchoResponse {
            mensagem: "Erro: corpo da requisição inválido ou sem a chave 'mensagem'.".to_string(),
            dados: None,
            dados_recebidos: None,
        }),
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

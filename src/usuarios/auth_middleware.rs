// src/usuarios/auth_middleware.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::usuario_structs::Claims;
use crate::shared::api_error::ApiError;
use crate::AppState;

/// Validade do token emitido após a verificação do código.
const VALIDADE_TOKEN_HORAS: i64 = 1;

/// Usuário autenticado, extraído do JWT das requisições protegidas.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub user_email: String,
}

/// Emite um JWT HS256 com as claims `{sub, email}` e expiração de 1 hora.
pub fn gerar_token(
    usuario_id: i32,
    email: &str,
    jwt_secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: usuario_id,
        email: email.to_string(),
        exp: (Utc::now() + Duration::hours(VALIDADE_TOKEN_HORAS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
}

/// Decodifica e valida um JWT, traduzindo as falhas para mensagens de 401.
pub fn validar_token(token: &str, jwt_secret: &str) -> Result<Claims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let mensagem = match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
            jsonwebtoken::errors::ErrorKind::InvalidSignature => "Assinatura do token inválida.",
            _ => "Token de autenticação inválido.",
        };
        ApiError::NaoAutorizado(mensagem.to_string())
    })
}

/// Extrai o token do cabeçalho `Authorization: Bearer <jwt>`.
pub fn extrair_bearer(valor: Option<&str>) -> Result<&str, ApiError> {
    let valor = valor
        .ok_or_else(|| ApiError::NaoAutorizado("Token de autenticação ausente.".to_string()))?;
    valor.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::NaoAutorizado("Formato de token inválido. Esperado 'Bearer <token>'.".to_string())
    })
}

/// Extrator de autenticação para Actix Web: valida o JWT do cabeçalho
/// Authorization e disponibiliza a identidade do chamador aos handlers.
impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let jwt_secret = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.config.jwt_secret.clone(),
            None => {
                log::error!("AppState indisponível no extrator de autenticação.");
                return ready(Err(ApiError::Interno.into()));
            }
        };

        let cabecalho = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok());

        let resultado = extrair_bearer(cabecalho)
            .and_then(|token| validar_token(token, &jwt_secret))
            .map(|claims| AuthenticatedUser {
                user_id: claims.sub,
                user_email: claims.email,
            })
            .map_err(actix_web::Error::from);

        ready(resultado)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEGREDO: &str = "segredo_de_teste_123";

    #[test]
    fn token_emitido_e_validado_carrega_identidade() {
        let token = gerar_token(42, "ana@x.com", SEGREDO).unwrap();
        let claims = validar_token(&token, SEGREDO).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ana@x.com");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn token_com_segredo_errado_e_rejeitado() {
        let token = gerar_token(42, "ana@x.com", SEGREDO).unwrap();
        let erro = validar_token(&token, "outro_segredo").unwrap_err();
        assert!(matches!(erro, ApiError::NaoAutorizado(_)));
    }

    #[test]
    fn token_expirado_e_rejeitado_com_mensagem_propria() {
        let claims = Claims {
            sub: 1,
            email: "ana@x.com".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SEGREDO.as_ref()),
        )
        .unwrap();

        let erro = validar_token(&token, SEGREDO).unwrap_err();
        assert_eq!(erro.to_string(), "Token expirado.");
    }

    #[test]
    fn cabecalho_ausente_ou_malformado_e_rejeitado() {
        assert!(extrair_bearer(None).is_err());
        assert!(extrair_bearer(Some("Basic abc")).is_err());
        assert_eq!(extrair_bearer(Some("Bearer abc")).unwrap(), "abc");
    }
}

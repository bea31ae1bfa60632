// src/shared/api_error.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use super::shared_structs::{RespostaApi, Toast};

/// Erro padronizado da API. Cada variante corresponde a um status HTTP e a
/// mensagem é devolvida ao cliente dentro do envelope de toast. Detalhes
/// internos (SQL, IO) nunca chegam ao cliente: são logados e degradam para
/// `Interno`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Campos ausentes ou malformados (400).
    #[error("{0}")]
    Validacao(String),

    /// Token ausente/inválido ou credenciais incorretas (401).
    #[error("{0}")]
    NaoAutorizado(String),

    /// Autenticado, mas não é o dono do recurso (403).
    #[error("{0}")]
    Proibido(String),

    /// Recurso inexistente (404).
    #[error("{0}")]
    NaoEncontrado(String),

    /// Violação de unicidade: e-mail ou categoria duplicada (409).
    #[error("{0}")]
    Conflito(String),

    /// Falha interna. A mensagem ao cliente é sempre genérica.
    #[error("Erro interno do servidor.")]
    Interno,
}

impl ApiError {
    /// Converte um erro do sqlx, mapeando violação de unicidade do Postgres
    /// (SQLSTATE 23505) para `Conflito` com a mensagem indicada. Qualquer
    /// outro erro é logado e vira `Interno`.
    pub fn de_unicidade(e: sqlx::Error, mensagem_conflito: &str) -> ApiError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23505") {
                return ApiError::Conflito(mensagem_conflito.to_string());
            }
        }
        ApiError::from(e)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        log::error!("Erro de banco de dados: {:?}", e);
        ApiError::Interno
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validacao(_) => StatusCode::BAD_REQUEST,
            ApiError::NaoAutorizado(_) => StatusCode::UNAUTHORIZED,
            ApiError::Proibido(_) => StatusCode::FORBIDDEN,
            ApiError::NaoEncontrado(_) => StatusCode::NOT_FOUND,
            ApiError::Conflito(_) => StatusCode::CONFLICT,
            ApiError::Interno => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(RespostaApi::somente_toast(Toast::erro(self.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variantes_mapeiam_para_os_status_corretos() {
        assert_eq!(
            ApiError::Validacao("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NaoAutorizado("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Proibido("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NaoEncontrado("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Conflito("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Interno.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn erro_interno_nao_vaza_detalhes() {
        let erro = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(erro.to_string(), "Erro interno do servidor.");
    }

    #[test]
    fn resposta_de_erro_usa_envelope_de_toast() {
        let resp = ApiError::NaoEncontrado("Jogo não encontrado.".into()).error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

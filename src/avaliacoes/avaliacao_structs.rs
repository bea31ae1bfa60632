// src/avaliacoes/avaliacao_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Corpo do envio de avaliação (nota de 1 a 5 e texto opcional).
#[derive(Deserialize)]
pub struct NovaAvaliacao {
    pub pontuacao: i32,
    pub texto: Option<String>,
}

/// Avaliação como persistida, devolvida após o upsert.
#[derive(Serialize, FromRow)]
pub struct Avaliacao {
    pub id: i32,
    #[serde(rename = "jogoId")]
    pub jogo_id: i32,
    #[serde(rename = "usuarioId")]
    pub usuario_id: i32,
    pub pontuacao: i32,
    pub texto: Option<String>,
    #[serde(rename = "dataCriacao")]
    pub data_criacao: DateTime<Utc>,
}

/// Avaliação na listagem, com o nome de quem avaliou.
#[derive(Serialize, FromRow)]
pub struct AvaliacaoComAutor {
    pub id: i32,
    #[serde(rename = "usuarioId")]
    pub usuario_id: i32,
    #[serde(rename = "usuarioNome")]
    pub usuario_nome: String,
    pub pontuacao: i32,
    pub texto: Option<String>,
    #[serde(rename = "dataCriacao")]
    pub data_criacao: DateTime<Utc>,
}

/// Resposta da listagem: as avaliações do jogo e a média das notas.
/// `media` é `null` quando o jogo ainda não tem avaliações, nunca zero.
#[derive(Serialize)]
pub struct ListaAvaliacoes {
    pub avaliacoes: Vec<AvaliacaoComAutor>,
    pub media: Option<f64>,
}

// src/jogos/jogo_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Jogo como devolvido pela API: a linha de `jogos` enriquecida com os nomes
/// das categorias associadas, agregados em uma única consulta com JOIN.
#[derive(Serialize, FromRow)]
pub struct JogoComCategorias {
    pub id: i32,
    pub nome: String,
    pub ano: i32,
    pub genero: String,
    pub imagem: String,
    #[serde(rename = "userId")]
    pub user_id: i32,
    pub privado: bool,
    pub categorias: Vec<String>,
}

/// Corpo da troca de visibilidade do jogo.
#[derive(Deserialize)]
pub struct AlterarPrivacidadeRequest {
    pub privado: bool,
}

/// Corpo da clonagem de um jogo de outro usuário para o próprio catálogo.
#[derive(Deserialize)]
pub struct AdicionarAoCatalogoRequest {
    #[serde(rename = "jogoId")]
    pub jogo_id: i32,
}

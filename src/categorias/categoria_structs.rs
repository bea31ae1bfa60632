// src/categorias/categoria_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura para receber dados de uma nova categoria na requisição POST/PUT
#[derive(Deserialize)]
pub struct NovaCategoria {
    pub nome: String,
}

/// Estrutura que representa uma categoria no banco de dados.
/// O nome é único por dono, não globalmente.
#[derive(Serialize, FromRow)]
pub struct Categoria {
    pub id: i32,
    pub nome: String,
    #[serde(rename = "userId")]
    pub user_id: i32,
}

/// Parâmetros da busca exata por nome (GET /api/categorias/busca?nome=).
#[derive(Deserialize)]
pub struct BuscaCategoria {
    pub nome: String,
}

/// Corpo da associação de categorias a um jogo.
#[derive(Deserialize)]
pub struct VincularCategoriasRequest {
    pub categorias: Vec<i32>,
}

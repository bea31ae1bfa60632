// src/categorias/categoria_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query, query_as, query_scalar};

use super::categoria_structs::{
    BuscaCategoria, Categoria, NovaCategoria, VincularCategoriasRequest,
};
use crate::shared::api_error::ApiError;
use crate::shared::shared_structs::{RespostaApi, Toast};
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Confere que o jogo existe e pertence ao chamador antes de mexer nas
/// associações de categorias.
async fn conferir_dono_do_jogo(
    data: &web::Data<AppState>,
    jogo_id: i32,
    usuario_id: i32,
) -> Result<(), ApiError> {
    let dono: Option<i32> = query_scalar("SELECT user_id FROM jogos WHERE id = $1")
        .bind(jogo_id)
        .fetch_optional(&data.db_pool)
        .await?;

    match dono {
        Some(dono) if dono == usuario_id => Ok(()),
        _ => Err(ApiError::NaoEncontrado("Jogo não encontrado.".to_string())),
    }
}

/// Rota para cadastrar uma nova categoria do usuário autenticado.
#[post("/api/categorias")]
pub async fn cadastrar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<NovaCategoria>,
) -> Result<HttpResponse, ApiError> {
    let nome = item.into_inner().nome.trim().to_string();
    if nome.is_empty() {
        return Err(ApiError::Validacao("Informe o nome da categoria.".to_string()));
    }

    let categoria = query_as::<_, Categoria>(
        "INSERT INTO categorias (nome, user_id) VALUES ($1, $2) RETURNING id, nome, user_id",
    )
    .bind(&nome)
    .bind(usuario.user_id)
    .fetch_one(&data.db_pool)
    .await
    .map_err(|e| ApiError::de_unicidade(e, "Você já possui uma categoria com esse nome."))?;

    Ok(HttpResponse::Created()
        .json(RespostaApi::sucesso("Categoria cadastrada com sucesso!", categoria)))
}

/// Rota para listar as categorias do usuário autenticado.
#[get("/api/categorias")]
pub async fn buscar_categorias(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let categorias = query_as::<_, Categoria>(
        "SELECT id, nome, user_id FROM categorias WHERE user_id = $1 ORDER BY nome",
    )
    .bind(usuario.user_id)
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(categorias))
}

/// Rota de busca exata por nome entre as categorias do chamador.
#[get("/api/categorias/busca")]
pub async fn buscar_categoria_por_nome(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    params: web::Query<BuscaCategoria>,
) -> Result<HttpResponse, ApiError> {
    let categoria = query_as::<_, Categoria>(
        "SELECT id, nome, user_id FROM categorias WHERE user_id = $1 AND nome = $2",
    )
    .bind(usuario.user_id)
    .bind(params.nome.trim())
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado("Categoria não encontrada.".to_string()))?;

    Ok(HttpResponse::Ok().json(categoria))
}

/// Rota para buscar uma categoria do chamador por ID.
#[get("/api/categorias/{id}")]
pub async fn buscar_categoria_por_id(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let categoria = query_as::<_, Categoria>(
        "SELECT id, nome, user_id FROM categorias WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(usuario.user_id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado(format!("Categoria com ID {} não encontrada.", id)))?;

    Ok(HttpResponse::Ok().json(categoria))
}

/// Rota para renomear uma categoria do chamador.
#[put("/api/categorias/{id}")]
pub async fn atualizar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    item: web::Json<NovaCategoria>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let nome = item.into_inner().nome.trim().to_string();
    if nome.is_empty() {
        return Err(ApiError::Validacao("Informe o nome da categoria.".to_string()));
    }

    let resultado = query("UPDATE categorias SET nome = $1 WHERE id = $2 AND user_id = $3")
        .bind(&nome)
        .bind(id)
        .bind(usuario.user_id)
        .execute(&data.db_pool)
        .await
        .map_err(|e| ApiError::de_unicidade(e, "Você já possui uma categoria com esse nome."))?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Categoria com ID {} não encontrada.",
            id
        )));
    }

    Ok(HttpResponse::Ok().json(RespostaApi::somente_toast(Toast::sucesso(
        "Categoria atualizada com sucesso!",
    ))))
}

/// Rota para excluir uma categoria do chamador.
/// As associações com jogos caem junto pelo ON DELETE CASCADE do schema.
#[delete("/api/categorias/{id}")]
pub async fn deletar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let resultado = query("DELETE FROM categorias WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(usuario.user_id)
        .execute(&data.db_pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Categoria com ID {} não encontrada.",
            id
        )));
    }

    Ok(HttpResponse::Ok().json(RespostaApi::somente_toast(Toast::sucesso(
        "Categoria excluída com sucesso!",
    ))))
}

/// Rota que associa categorias a um jogo do chamador.
/// A inserção é idempotente (ON CONFLICT DO NOTHING): repetir uma associação
/// não cria linha duplicada nem falha. Somente categorias do próprio usuário
/// são associadas; IDs alheios são ignorados pelo filtro da consulta.
#[post("/api/jogos/{id}/categorias")]
pub async fn vincular_categorias(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    req: web::Json<VincularCategoriasRequest>,
) -> Result<HttpResponse, ApiError> {
    let jogo_id = path.into_inner();
    let categorias = req.into_inner().categorias;

    if categorias.is_empty() {
        return Err(ApiError::Validacao(
            "Informe ao menos uma categoria.".to_string(),
        ));
    }

    conferir_dono_do_jogo(&data, jogo_id, usuario.user_id).await?;

    query(
        "INSERT INTO jogo_categorias (jogo_id, categoria_id) \
         SELECT $1, id FROM categorias WHERE id = ANY($2) AND user_id = $3 \
         ON CONFLICT DO NOTHING",
    )
    .bind(jogo_id)
    .bind(&categorias)
    .bind(usuario.user_id)
    .execute(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(RespostaApi::somente_toast(Toast::sucesso(
        "Categorias vinculadas ao jogo!",
    ))))
}

/// Rota que desfaz a associação de uma categoria (pelo nome) com um jogo.
#[delete("/api/jogos/{id}/categorias/{nome}")]
pub async fn desvincular_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<(i32, String)>,
) -> Result<HttpResponse, ApiError> {
    let (jogo_id, nome) = path.into_inner();

    conferir_dono_do_jogo(&data, jogo_id, usuario.user_id).await?;

    let categoria_id: Option<i32> =
        query_scalar("SELECT id FROM categorias WHERE user_id = $1 AND nome = $2")
            .bind(usuario.user_id)
            .bind(&nome)
            .fetch_optional(&data.db_pool)
            .await?;

    let categoria_id = categoria_id
        .ok_or_else(|| ApiError::NaoEncontrado("Categoria não encontrada.".to_string()))?;

    let resultado = query(
        "DELETE FROM jogo_categorias WHERE jogo_id = $1 AND categoria_id = $2",
    )
    .bind(jogo_id)
    .bind(categoria_id)
    .execute(&data.db_pool)
    .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(
            "Categoria não está associada a este jogo.".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(RespostaApi::somente_toast(Toast::sucesso(
        "Categoria removida do jogo!",
    ))))
}

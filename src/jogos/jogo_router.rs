// src/jogos/jogo_router.rs

use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query, query_as, query_scalar};

use super::jogo_structs::{
    AdicionarAoCatalogoRequest, AlterarPrivacidadeRequest, JogoComCategorias,
};
use super::upload::{ler_form_jogo, resolver_imagem};
use crate::shared::api_error::ApiError;
use crate::shared::shared_structs::{RespostaApi, Toast};
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Consulta base dos jogos: uma única passagem com JOIN agrega os nomes das
/// categorias de cada jogo, evitando uma subconsulta por linha.
const SQL_JOGOS: &str =
    "SELECT j.id, j.nome, j.ano, j.genero, j.imagem, j.user_id, j.privado, \
     COALESCE(ARRAY_AGG(c.nome ORDER BY c.nome) FILTER (WHERE c.id IS NOT NULL), '{}') AS categorias \
     FROM jogos j \
     LEFT JOIN jogo_categorias jc ON jc.jogo_id = j.id \
     LEFT JOIN categorias c ON c.id = jc.categoria_id";

/// Busca a forma canônica de um jogo (com categorias) após uma mutação.
async fn buscar_jogo_canonico(
    data: &web::Data<AppState>,
    jogo_id: i32,
) -> Result<JogoComCategorias, ApiError> {
    let sql = format!("{} WHERE j.id = $1 GROUP BY j.id", SQL_JOGOS);
    let jogo = query_as::<_, JogoComCategorias>(&sql)
        .bind(jogo_id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| ApiError::NaoEncontrado("Jogo não encontrado.".to_string()))?;
    Ok(jogo)
}

/// Rota que lista os jogos do usuário autenticado.
#[get("/api/jogos")]
pub async fn buscar_jogos(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let sql = format!("{} WHERE j.user_id = $1 GROUP BY j.id ORDER BY j.nome", SQL_JOGOS);
    let jogos = query_as::<_, JogoComCategorias>(&sql)
        .bind(usuario.user_id)
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(jogos))
}

/// Rota do catálogo público: jogos não privados de todos os usuários, mais os
/// do próprio chamador, ordenados por nome.
#[get("/api/jogos/todos")]
pub async fn buscar_todos_jogos(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let sql = format!(
        "{} WHERE j.privado = FALSE OR j.user_id = $1 GROUP BY j.id ORDER BY j.nome",
        SQL_JOGOS
    );
    let jogos = query_as::<_, JogoComCategorias>(&sql)
        .bind(usuario.user_id)
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(jogos))
}

/// Rota para cadastrar um jogo (multipart).
/// Exige nome, ano e gênero, e exatamente uma origem de imagem: arquivo
/// enviado ou campo `imagemUrl`.
#[post("/api/jogos")]
pub async fn cadastrar_jogo(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let mut form = ler_form_jogo(payload).await?;

    let (nome, ano, genero) = match (form.nome.take(), form.ano.take(), form.genero.take()) {
        (Some(nome), Some(ano), Some(genero)) => (nome, ano, genero),
        _ => {
            return Err(ApiError::Validacao(
                "Informe nome, ano e gênero do jogo.".to_string(),
            ))
        }
    };
    let privado = form.privado.take().unwrap_or(false);
    let imagem = resolver_imagem(&mut form, &data.config.diretorio_uploads, true)
        .await?
        .unwrap_or_default();

    let id: i32 = query_scalar(
        "INSERT INTO jogos (nome, ano, genero, imagem, user_id, privado) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&nome)
    .bind(ano)
    .bind(&genero)
    .bind(&imagem)
    .bind(usuario.user_id)
    .bind(privado)
    .fetch_one(&data.db_pool)
    .await?;

    let jogo = buscar_jogo_canonico(&data, id).await?;
    Ok(HttpResponse::Created().json(RespostaApi::sucesso("Jogo criado com sucesso!", jogo)))
}

/// Rota para atualizar um jogo do próprio usuário (multipart, parcial).
/// Campos ausentes mantêm o valor atual; a troca de imagem é opcional.
#[put("/api/jogos/{id}")]
pub async fn atualizar_jogo(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let jogo_id = path.into_inner();
    let mut form = ler_form_jogo(payload).await?;
    let imagem = resolver_imagem(&mut form, &data.config.diretorio_uploads, false).await?;

    let resultado = query(
        "UPDATE jogos SET \
           nome = COALESCE($1, nome), \
           ano = COALESCE($2, ano), \
           genero = COALESCE($3, genero), \
           imagem = COALESCE($4, imagem), \
           privado = COALESCE($5, privado) \
         WHERE id = $6 AND user_id = $7",
    )
    .bind(form.nome.take())
    .bind(form.ano.take())
    .bind(form.genero.take())
    .bind(imagem)
    .bind(form.privado.take())
    .bind(jogo_id)
    .bind(usuario.user_id)
    .execute(&data.db_pool)
    .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado("Jogo não encontrado.".to_string()));
    }

    let jogo = buscar_jogo_canonico(&data, jogo_id).await?;
    Ok(HttpResponse::Ok().json(RespostaApi::sucesso("Jogo atualizado com sucesso!", jogo)))
}

/// Rota para excluir um jogo. A consulta é restrita ao dono: excluir o jogo
/// de outro usuário resulta em 404.
#[delete("/api/jogos/{id}")]
pub async fn deletar_jogo(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let jogo_id = path.into_inner();

    let resultado = query("DELETE FROM jogos WHERE id = $1 AND user_id = $2")
        .bind(jogo_id)
        .bind(usuario.user_id)
        .execute(&data.db_pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado("Jogo não encontrado.".to_string()));
    }

    Ok(HttpResponse::Ok().json(RespostaApi::somente_toast(Toast::sucesso(
        "Jogo excluído com sucesso!",
    ))))
}

/// Rota para alternar a visibilidade de um jogo.
/// Diferente da exclusão, aqui o jogo de outro dono responde 403, para o
/// cliente distinguir "não existe" de "não é seu".
#[put("/api/jogos/{id}/privado")]
pub async fn alterar_privacidade(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    req: web::Json<AlterarPrivacidadeRequest>,
) -> Result<HttpResponse, ApiError> {
    let jogo_id = path.into_inner();

    let dono: Option<i32> = query_scalar("SELECT user_id FROM jogos WHERE id = $1")
        .bind(jogo_id)
        .fetch_optional(&data.db_pool)
        .await?;

    match dono {
        None => return Err(ApiError::NaoEncontrado("Jogo não encontrado.".to_string())),
        Some(dono) if dono != usuario.user_id => {
            return Err(ApiError::Proibido(
                "Apenas o dono pode alterar a visibilidade do jogo.".to_string(),
            ))
        }
        Some(_) => {}
    }

    query("UPDATE jogos SET privado = $1 WHERE id = $2")
        .bind(req.privado)
        .bind(jogo_id)
        .execute(&data.db_pool)
        .await?;

    let mensagem = if req.privado {
        "Jogo marcado como privado."
    } else {
        "Jogo visível no catálogo público."
    };
    Ok(HttpResponse::Ok().json(RespostaApi::somente_toast(Toast::sucesso(mensagem))))
}

/// Consulta do jogo de origem da clonagem, limitada ao que o chamador pode
/// ver no catálogo: jogos públicos ou os dele próprio. Jogo privado de outro
/// usuário responde 404, nunca é clonável por palpite de ID.
const SQL_JOGO_ORIGEM: &str =
    "SELECT nome, ano, genero, imagem FROM jogos \
     WHERE id = $1 AND (privado = FALSE OR user_id = $2)";

/// Rota que copia um jogo de outro usuário para o catálogo do chamador.
#[post("/api/jogos/adicionar-ao-catalogo")]
pub async fn adicionar_ao_catalogo(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    req: web::Json<AdicionarAoCatalogoRequest>,
) -> Result<HttpResponse, ApiError> {
    let origem: Option<(String, i32, String, String)> = query_as(SQL_JOGO_ORIGEM)
        .bind(req.jogo_id)
        .bind(usuario.user_id)
        .fetch_optional(&data.db_pool)
        .await?;

    let (nome, ano, genero, imagem) = origem
        .ok_or_else(|| ApiError::NaoEncontrado("Jogo de origem não encontrado.".to_string()))?;

    let ja_possui: Option<i32> =
        query_scalar("SELECT id FROM jogos WHERE user_id = $1 AND nome = $2")
            .bind(usuario.user_id)
            .bind(&nome)
            .fetch_optional(&data.db_pool)
            .await?;

    if ja_possui.is_some() {
        return Err(ApiError::Conflito(
            "Este jogo já está no seu catálogo.".to_string(),
        ));
    }

    let novo_id: i32 = query_scalar(
        "INSERT INTO jogos (nome, ano, genero, imagem, user_id, privado) \
         VALUES ($1, $2, $3, $4, $5, FALSE) RETURNING id",
    )
    .bind(&nome)
    .bind(ano)
    .bind(&genero)
    .bind(&imagem)
    .bind(usuario.user_id)
    .fetch_one(&data.db_pool)
    .await?;

    Ok(HttpResponse::Created().json(RespostaApi::sucesso(
        "Jogo adicionado ao seu catálogo!",
        serde_json::json!({ "newGameId": novo_id }),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consulta_de_origem_da_clonagem_exclui_jogos_privados_de_terceiros() {
        // O filtro de visibilidade precisa estar na própria consulta: sem
        // ele, qualquer autenticado clonaria um jogo privado alheio por
        // palpite de ID.
        assert!(SQL_JOGO_ORIGEM.contains("privado = FALSE OR user_id = $2"));
    }

    #[test]
    fn listagens_agregam_categorias_em_uma_unica_consulta() {
        assert!(SQL_JOGOS.contains("ARRAY_AGG"));
        assert!(SQL_JOGOS.contains("LEFT JOIN jogo_categorias"));
    }
}

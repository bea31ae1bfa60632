// src/avaliacoes/avaliacao_router.rs

use actix_web::{delete, get, post, web, HttpResponse};
use sqlx::{query, query_as, query_scalar};

use super::avaliacao_structs::{Avaliacao, AvaliacaoComAutor, ListaAvaliacoes, NovaAvaliacao};
use crate::shared::api_error::ApiError;
use crate::shared::shared_structs::{RespostaApi, Toast};
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Valida a nota da avaliação: somente valores de 1 a 5.
fn validar_pontuacao(pontuacao: i32) -> Result<(), ApiError> {
    if !(1..=5).contains(&pontuacao) {
        return Err(ApiError::Validacao(
            "A pontuação deve estar entre 1 e 5.".to_string(),
        ));
    }
    Ok(())
}

async fn conferir_jogo_existe(
    data: &web::Data<AppState>,
    jogo_id: i32,
) -> Result<(), ApiError> {
    let existe: Option<i32> = query_scalar("SELECT id FROM jogos WHERE id = $1")
        .bind(jogo_id)
        .fetch_optional(&data.db_pool)
        .await?;
    if existe.is_none() {
        return Err(ApiError::NaoEncontrado("Jogo não encontrado.".to_string()));
    }
    Ok(())
}

/// Rota para enviar (ou substituir) a avaliação do chamador para um jogo.
/// Um único INSERT ... ON CONFLICT faz o upsert de forma atômica: a segunda
/// avaliação do mesmo usuário para o mesmo jogo sobrescreve a primeira em
/// vez de criar outra linha.
#[post("/api/jogos/{id}/avaliacao")]
pub async fn enviar_avaliacao(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    req: web::Json<NovaAvaliacao>,
) -> Result<HttpResponse, ApiError> {
    let jogo_id = path.into_inner();
    let req = req.into_inner();

    validar_pontuacao(req.pontuacao)?;
    conferir_jogo_existe(&data, jogo_id).await?;

    let avaliacao = query_as::<_, Avaliacao>(
        "INSERT INTO avaliacoes (jogo_id, usuario_id, pontuacao, texto) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (jogo_id, usuario_id) DO UPDATE \
           SET pontuacao = EXCLUDED.pontuacao, texto = EXCLUDED.texto, data_criacao = NOW() \
         RETURNING id, jogo_id, usuario_id, pontuacao, texto, data_criacao",
    )
    .bind(jogo_id)
    .bind(usuario.user_id)
    .bind(req.pontuacao)
    .bind(req.texto.as_deref().map(str::trim).filter(|t| !t.is_empty()))
    .fetch_one(&data.db_pool)
    .await?;

    Ok(HttpResponse::Created().json(RespostaApi::sucesso(
        "Avaliação registrada com sucesso!",
        avaliacao,
    )))
}

/// Rota que lista as avaliações de um jogo, com o nome de quem avaliou,
/// da mais recente para a mais antiga, junto da média das notas.
#[get("/api/jogos/{id}/avaliacoes")]
pub async fn buscar_avaliacoes(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let jogo_id = path.into_inner();
    conferir_jogo_existe(&data, jogo_id).await?;

    let avaliacoes = query_as::<_, AvaliacaoComAutor>(
        "SELECT a.id, a.usuario_id, u.nome AS usuario_nome, a.pontuacao, a.texto, a.data_criacao \
         FROM avaliacoes a \
         JOIN usuarios u ON u.id = a.usuario_id \
         WHERE a.jogo_id = $1 \
         ORDER BY a.data_criacao DESC",
    )
    .bind(jogo_id)
    .fetch_all(&data.db_pool)
    .await?;

    // AVG devolve NULL quando não há linhas; o cliente distingue assim
    // "sem avaliações" de "nota zero".
    let media: Option<f64> =
        query_scalar("SELECT AVG(pontuacao)::FLOAT8 FROM avaliacoes WHERE jogo_id = $1")
            .bind(jogo_id)
            .fetch_one(&data.db_pool)
            .await?;

    Ok(HttpResponse::Ok().json(ListaAvaliacoes { avaliacoes, media }))
}

/// Rota para remover a avaliação do próprio chamador em um jogo.
#[delete("/api/jogos/{id}/avaliacao")]
pub async fn deletar_avaliacao(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let jogo_id = path.into_inner();

    let resultado = query("DELETE FROM avaliacoes WHERE jogo_id = $1 AND usuario_id = $2")
        .bind(jogo_id)
        .bind(usuario.user_id)
        .execute(&data.db_pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(
            "Você não possui avaliação neste jogo.".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(RespostaApi::somente_toast(Toast::sucesso(
        "Avaliação removida com sucesso!",
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pontuacao_fora_do_intervalo_e_rejeitada() {
        assert!(validar_pontuacao(0).is_err());
        assert!(validar_pontuacao(6).is_err());
        assert!(validar_pontuacao(-3).is_err());
    }

    #[test]
    fn pontuacao_de_um_a_cinco_e_aceita() {
        for nota in 1..=5 {
            assert!(validar_pontuacao(nota).is_ok());
        }
    }
}

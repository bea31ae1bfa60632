// src/usuarios/usuario_router.rs

use actix_web::{delete, get, post, put, rt, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::{query, query_as, query_scalar};

use super::auth_middleware::{gerar_token, AuthenticatedUser};
use super::usuario_structs::{
    AtualizarUsuario, AuthResponse, ConfirmarSenhaRequest, LoginRequest, NovoUsuario,
    RedefinirSenhaRequest, RequerVerificacao, Usuario, UsuarioPublico, VerificarCodigoRequest,
};
use crate::shared::api_error::ApiError;
use crate::shared::shared_structs::{RespostaApi, Toast};
use crate::AppState;

/// Mensagem única para e-mail inexistente e senha incorreta, para não
/// permitir enumeração de usuários.
const MSG_CREDENCIAIS_INVALIDAS: &str = "Credenciais inválidas.";

/// Validade do token de redefinição de senha.
const VALIDADE_RESET_HORAS: i64 = 1;

const COLUNAS_USUARIO: &str = "id, email, senha_hash";

/// Gera o código de verificação de 6 dígitos enviado por e-mail.
fn gerar_codigo_verificacao() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32))
}

/// Gera o token aleatório usado no link de redefinição de senha.
fn gerar_token_redefinicao() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

fn validar_senha(senha: &str) -> Result<(), ApiError> {
    if senha.len() < 6 {
        return Err(ApiError::Validacao(
            "A senha deve ter pelo menos 6 caracteres.".to_string(),
        ));
    }
    Ok(())
}

fn hash_senha(senha: &str) -> Result<String, ApiError> {
    hash(senha, DEFAULT_COST).map_err(|e| {
        log::error!("Erro ao fazer hash da senha: {:?}", e);
        ApiError::Interno
    })
}

async fn buscar_usuario_por_email(
    data: &web::Data<AppState>,
    email: &str,
) -> Result<Option<Usuario>, ApiError> {
    let sql = format!("SELECT {} FROM usuarios WHERE email = $1", COLUNAS_USUARIO);
    let usuario = query_as::<_, Usuario>(&sql)
        .bind(email)
        .fetch_optional(&data.db_pool)
        .await?;
    Ok(usuario)
}

/// Rota para cadastrar um novo usuário.
/// Gera um código de verificação e dispara o e-mail sem bloquear o cadastro:
/// falha no envio é logada e o cadastro ainda retorna sucesso.
#[post("/api/usuarios")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    novo_usuario: web::Json<NovoUsuario>,
) -> Result<HttpResponse, ApiError> {
    let novo_usuario = novo_usuario.into_inner();

    if novo_usuario.nome.trim().is_empty() || novo_usuario.email.trim().is_empty() {
        return Err(ApiError::Validacao("Informe nome e e-mail.".to_string()));
    }
    validar_senha(&novo_usuario.senha)?;

    let senha_hash = hash_senha(&novo_usuario.senha)?;
    let codigo = gerar_codigo_verificacao();

    let id: i32 = query_scalar(
        "INSERT INTO usuarios (nome, email, senha_hash, codigo_verificacao) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(novo_usuario.nome.trim())
    .bind(novo_usuario.email.trim())
    .bind(&senha_hash)
    .bind(&codigo)
    .fetch_one(&data.db_pool)
    .await
    .map_err(|e| ApiError::de_unicidade(e, "E-mail já cadastrado."))?;

    // Envio do código em segundo plano: o cadastro não espera o notificador.
    let notificador = data.notificador.clone();
    let email = novo_usuario.email.trim().to_string();
    rt::spawn(async move {
        let corpo = format!("Seu código de verificação GameVerse é: {}", codigo);
        if let Err(e) = notificador
            .enviar(&email, "Código de verificação GameVerse", &corpo)
            .await
        {
            log::warn!("Falha ao enviar e-mail de cadastro para {}: {}", email, e);
        }
    });

    Ok(HttpResponse::Created().json(RespostaApi::sucesso(
        "Usuário cadastrado com sucesso!",
        serde_json::json!({ "id": id }),
    )))
}

/// Rota de login (etapa 1 do fluxo em duas etapas).
/// Com as credenciais corretas, persiste um novo código de verificação e o
/// envia por e-mail; o token só é emitido em /api/verificar-codigo.
#[post("/api/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    login_request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let login_request = login_request.into_inner();

    if login_request.email.trim().is_empty() || login_request.senha.is_empty() {
        return Err(ApiError::Validacao("Informe e-mail e senha.".to_string()));
    }

    let usuario = buscar_usuario_por_email(&data, login_request.email.trim())
        .await?
        .ok_or_else(|| ApiError::NaoAutorizado(MSG_CREDENCIAIS_INVALIDAS.to_string()))?;

    let senha_confere = verify(&login_request.senha, &usuario.senha_hash).map_err(|e| {
        log::error!("Erro ao verificar senha: {:?}", e);
        ApiError::Interno
    })?;

    if !senha_confere {
        return Err(ApiError::NaoAutorizado(MSG_CREDENCIAIS_INVALIDAS.to_string()));
    }

    let codigo = gerar_codigo_verificacao();
    query("UPDATE usuarios SET codigo_verificacao = $1 WHERE id = $2")
        .bind(&codigo)
        .bind(usuario.id)
        .execute(&data.db_pool)
        .await?;

    // Sem o código o usuário não consegue concluir o login, então o envio
    // é aguardado e uma falha aqui encerra a requisição com erro.
    let corpo = format!("Seu código de verificação GameVerse é: {}", codigo);
    data.notificador
        .enviar(&usuario.email, "Código de verificação GameVerse", &corpo)
        .await
        .map_err(|e| {
            log::error!("Falha ao enviar código de login para {}: {}", usuario.email, e);
            ApiError::Interno
        })?;

    Ok(HttpResponse::Ok().json(RespostaApi::sucesso(
        "Enviamos um código de verificação para o seu e-mail.",
        RequerVerificacao { require_verification: true },
    )))
}

/// Rota de verificação do código (etapa 2 do login).
/// Confere o código pendente; no acerto limpa o código, marca a conta como
/// verificada e emite o token.
#[post("/api/verificar-codigo")]
pub async fn verificar_codigo(
    data: web::Data<AppState>,
    req: web::Json<VerificarCodigoRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let linha: Option<(i32, String)> = query_as(
        "UPDATE usuarios SET codigo_verificacao = NULL, verificado = TRUE \
         WHERE email = $1 AND codigo_verificacao = $2 RETURNING id, email",
    )
    .bind(req.email.trim())
    .bind(req.codigo.trim())
    .fetch_optional(&data.db_pool)
    .await?;

    let (id, email) = linha
        .ok_or_else(|| ApiError::NaoAutorizado("Código de verificação inválido.".to_string()))?;

    let token = gerar_token(id, &email, &data.config.jwt_secret).map_err(|e| {
        log::error!("Erro ao gerar JWT: {:?}", e);
        ApiError::Interno
    })?;

    Ok(HttpResponse::Ok().json(RespostaApi::sucesso(
        "Login realizado com sucesso!",
        AuthResponse { token, id },
    )))
}

/// Rota para solicitar a redefinição de senha.
/// A resposta é sempre a mesma, exista ou não o e-mail, para não permitir
/// enumeração de usuários; o envio do link acontece em segundo plano.
#[post("/api/redefinir-senha")]
pub async fn solicitar_redefinicao_senha(
    data: web::Data<AppState>,
    req: web::Json<RedefinirSenhaRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = req.into_inner().email.trim().to_string();

    if let Some(usuario) = buscar_usuario_por_email(&data, &email).await? {
        let token = gerar_token_redefinicao();
        let expira = Utc::now() + Duration::hours(VALIDADE_RESET_HORAS);

        query(
            "UPDATE usuarios SET reset_password_token = $1, reset_password_expires = $2 \
             WHERE id = $3",
        )
        .bind(&token)
        .bind(expira)
        .bind(usuario.id)
        .execute(&data.db_pool)
        .await?;

        let notificador = data.notificador.clone();
        let link = format!("{}/resetar-senha/{}", data.config.url_frontend, token);
        rt::spawn(async move {
            let corpo = format!(
                "Para redefinir sua senha GameVerse, acesse: {}\nO link expira em 1 hora.",
                link
            );
            if let Err(e) = notificador
                .enviar(&usuario.email, "Redefinição de senha GameVerse", &corpo)
                .await
            {
                log::warn!("Falha ao enviar link de redefinição para {}: {}", usuario.email, e);
            }
        });
    }

    Ok(HttpResponse::Ok().json(RespostaApi::somente_toast(Toast::info(
        "Se o e-mail estiver cadastrado, você receberá as instruções de redefinição.",
    ))))
}

/// Rota que conclui a redefinição de senha a partir do token enviado por
/// e-mail. A troca do hash e a limpeza do token acontecem no mesmo UPDATE.
#[post("/api/resetar-senha-confirmacao/{token}")]
pub async fn confirmar_redefinicao_senha(
    data: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ConfirmarSenhaRequest>,
) -> Result<HttpResponse, ApiError> {
    let token = path.into_inner();
    let req = req.into_inner();

    validar_senha(&req.nova_senha)?;
    let senha_hash = hash_senha(&req.nova_senha)?;

    let resultado = query(
        "UPDATE usuarios SET senha_hash = $1, reset_password_token = NULL, \
         reset_password_expires = NULL \
         WHERE reset_password_token = $2 AND reset_password_expires > NOW()",
    )
    .bind(&senha_hash)
    .bind(&token)
    .execute(&data.db_pool)
    .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::Validacao(
            "Token de redefinição inválido ou expirado.".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(RespostaApi::somente_toast(Toast::sucesso(
        "Senha redefinida com sucesso!",
    ))))
}

/// Rota que lista os usuários cadastrados (visão pública, sem hash de senha).
#[get("/api/usuarios")]
pub async fn buscar_usuarios(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let usuarios = query_as::<_, UsuarioPublico>(
        "SELECT id, nome, email, verificado FROM usuarios ORDER BY nome",
    )
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(usuarios))
}

/// Rota de leitura do perfil de um usuário.
#[get("/api/usuarios/{id}")]
pub async fn buscar_usuario_por_id(
    data: web::Data<AppState>,
    _usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let usuario = query_as::<_, UsuarioPublico>(
        "SELECT id, nome, email, verificado FROM usuarios WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| ApiError::NaoEncontrado(format!("Usuário com ID {} não encontrado.", id)))?;

    Ok(HttpResponse::Ok().json(usuario))
}

/// Rota de atualização de perfil (parcial). Somente o próprio usuário pode
/// alterar a própria conta; trocar a senha re-hasheia antes de persistir.
#[put("/api/usuarios/{id}")]
pub async fn atualizar_usuario(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
    req: web::Json<AtualizarUsuario>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if id != usuario.user_id {
        return Err(ApiError::Proibido(
            "Você só pode alterar o próprio perfil.".to_string(),
        ));
    }

    let req = req.into_inner();
    let senha_hash = match req.senha.as_deref() {
        Some(senha) => {
            validar_senha(senha)?;
            Some(hash_senha(senha)?)
        }
        None => None,
    };

    let resultado = query(
        "UPDATE usuarios SET \
           nome = COALESCE($1, nome), \
           email = COALESCE($2, email), \
           senha_hash = COALESCE($3, senha_hash) \
         WHERE id = $4",
    )
    .bind(req.nome.as_deref().map(str::trim).filter(|s| !s.is_empty()))
    .bind(req.email.as_deref().map(str::trim).filter(|s| !s.is_empty()))
    .bind(senha_hash)
    .bind(id)
    .execute(&data.db_pool)
    .await
    .map_err(|e| ApiError::de_unicidade(e, "E-mail já cadastrado."))?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Usuário com ID {} não encontrado.",
            id
        )));
    }

    let perfil = query_as::<_, UsuarioPublico>(
        "SELECT id, nome, email, verificado FROM usuarios WHERE id = $1",
    )
    .bind(id)
    .fetch_one(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(RespostaApi::sucesso("Perfil atualizado com sucesso!", perfil)))
}

/// Rota de exclusão de conta. Restrita ao próprio usuário; jogos, categorias
/// e avaliações caem junto pelo ON DELETE CASCADE do schema.
#[delete("/api/usuarios/{id}")]
pub async fn deletar_usuario(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if id != usuario.user_id {
        return Err(ApiError::Proibido(
            "Você só pode excluir a própria conta.".to_string(),
        ));
    }

    let resultado = query("DELETE FROM usuarios WHERE id = $1")
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(ApiError::NaoEncontrado(format!(
            "Usuário com ID {} não encontrado.",
            id
        )));
    }

    Ok(HttpResponse::Ok().json(RespostaApi::somente_toast(Toast::sucesso(
        "Conta excluída com sucesso!",
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codigo_de_verificacao_tem_seis_digitos() {
        for _ in 0..50 {
            let codigo = gerar_codigo_verificacao();
            assert_eq!(codigo.len(), 6);
            assert!(codigo.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn token_de_redefinicao_e_longo_e_alfanumerico() {
        let token = gerar_token_redefinicao();
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

        // Dois tokens consecutivos não colidem.
        assert_ne!(token, gerar_token_redefinicao());
    }

    #[test]
    fn senha_curta_e_rejeitada_na_validacao() {
        assert!(validar_senha("12345").is_err());
        assert!(validar_senha("123456").is_ok());
    }

    #[test]
    fn visao_publica_de_usuario_nao_expoe_senha_hash() {
        let perfil = UsuarioPublico {
            id: 1,
            nome: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            verificado: true,
        };
        let json = serde_json::to_value(&perfil).unwrap();

        assert_eq!(json["nome"], "Ana");
        assert_eq!(json["verificado"], true);
        assert!(json.get("senha_hash").is_none());
    }

    #[test]
    fn credenciais_selecionam_somente_o_que_o_login_le() {
        assert_eq!(COLUNAS_USUARIO, "id, email, senha_hash");
    }

    #[test]
    fn hash_de_senha_e_verificavel_e_nao_e_texto_claro() {
        let senha = "Secret123!";
        let hash = bcrypt::hash(senha, 4).unwrap();
        assert_ne!(hash, senha);
        assert!(bcrypt::verify(senha, &hash).unwrap());
        assert!(!bcrypt::verify("outra", &hash).unwrap());
    }
}

// src/usuarios/usuario_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Credenciais de um usuário, o que os fluxos de login e redefinição leem.
/// A senha é armazenada apenas como hash bcrypt; código de verificação e
/// token de redefinição são escritos e conferidos direto nas consultas.
#[derive(FromRow)]
pub struct Usuario {
    pub id: i32,
    pub email: String,
    pub senha_hash: String,
}

/// Visão pública de um usuário, devolvida pela listagem e pelo perfil.
/// Nunca carrega o hash da senha nem os campos de verificação/redefinição.
#[derive(Serialize, FromRow)]
pub struct UsuarioPublico {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub verificado: bool,
}

/// Corpo da atualização de perfil (parcial: só os campos presentes mudam).
#[derive(Deserialize)]
pub struct AtualizarUsuario {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub senha: Option<String>,
}

/// Corpo da requisição de cadastro.
#[derive(Deserialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String, // Senha em texto claro (hashed antes de salvar)
}

/// Corpo da requisição de login (etapa 1).
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

/// Corpo da requisição de verificação do código (etapa 2 do login).
#[derive(Deserialize)]
pub struct VerificarCodigoRequest {
    pub email: String,
    pub codigo: String,
}

/// Corpo da solicitação de redefinição de senha.
#[derive(Deserialize)]
pub struct RedefinirSenhaRequest {
    pub email: String,
}

/// Corpo da confirmação de redefinição de senha.
#[derive(Deserialize)]
pub struct ConfirmarSenhaRequest {
    #[serde(rename = "novaSenha")]
    pub nova_senha: String,
}

/// Payload do JWT (Claims): identidade do usuário e expiração.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,      // ID do usuário
    pub email: String, // E-mail do usuário
    pub exp: i64,      // Expiration Time (timestamp Unix)
}

/// Resposta da etapa 1 do login: o token só é emitido após a verificação.
#[derive(Serialize)]
pub struct RequerVerificacao {
    #[serde(rename = "requireVerification")]
    pub require_verification: bool,
}

/// Resposta da verificação bem-sucedida, com o token emitido.
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub id: i32,
}

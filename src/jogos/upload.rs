// src/jogos/upload.rs

use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use actix_web::web;
use futures::TryStreamExt;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::shared::api_error::ApiError;

/// Limite de tamanho do arquivo de imagem enviado.
pub const TAMANHO_MAX_IMAGEM: usize = 5 * 1024 * 1024;

/// Limite dos campos de texto do formulário (nome, ano, gênero, URL).
pub const TAMANHO_MAX_CAMPO_TEXTO: usize = 4 * 1024;

/// Limite e mensagem de estouro adequados ao campo: o teto de 5MB vale
/// somente para o arquivo de imagem; campos de texto têm um teto curto e
/// mensagem própria.
fn limite_do_campo(nome_campo: &str) -> (usize, &'static str) {
    if nome_campo == "imagem" {
        (TAMANHO_MAX_IMAGEM, "A imagem excede o limite de 5MB.")
    } else {
        (TAMANHO_MAX_CAMPO_TEXTO, "Campo de texto excede o tamanho máximo.")
    }
}

/// Campos do formulário multipart de criação/atualização de jogo.
/// A imagem chega por exatamente um dos dois caminhos: arquivo enviado
/// (`imagem`) ou URL externa (`imagemUrl`).
#[derive(Default)]
pub struct FormJogo {
    pub nome: Option<String>,
    pub ano: Option<i32>,
    pub genero: Option<String>,
    pub privado: Option<bool>,
    pub imagem_url: Option<String>,
    /// Extensão detectada e bytes do arquivo enviado.
    pub arquivo: Option<(&'static str, Vec<u8>)>,
}

/// Detecta o formato da imagem pelos bytes iniciais (magic bytes).
/// Somente JPEG, PNG e GIF são aceitos; a extensão devolvida é usada no nome
/// do arquivo gravado em disco.
pub fn detectar_extensao(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        Some("png")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else {
        None
    }
}

fn nome_arquivo_aleatorio(extensao: &str) -> String {
    let aleatorio: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    format!("{}.{}", aleatorio, extensao)
}

fn erro_multipart(e: actix_multipart::MultipartError) -> ApiError {
    log::warn!("Falha ao ler formulário multipart: {:?}", e);
    ApiError::Validacao("Falha ao ler o formulário enviado.".to_string())
}

/// Lê o formulário multipart de jogo, acumulando os campos de texto e, quando
/// presente, o arquivo de imagem. O arquivo é validado por magic bytes antes
/// de qualquer gravação em disco e limitado a 5MB durante a própria leitura.
pub async fn ler_form_jogo(mut payload: Multipart) -> Result<FormJogo, ApiError> {
    let mut form = FormJogo::default();

    while let Some(mut campo) = payload.try_next().await.map_err(erro_multipart)? {
        let nome_campo = campo.name().to_string();
        let (limite, mensagem_estouro) = limite_do_campo(&nome_campo);

        let mut dados: Vec<u8> = Vec::new();
        while let Some(pedaco) = campo.try_next().await.map_err(erro_multipart)? {
            if dados.len() + pedaco.len() > limite {
                return Err(ApiError::Validacao(mensagem_estouro.to_string()));
            }
            dados.extend_from_slice(&pedaco);
        }

        match nome_campo.as_str() {
            "imagem" => {
                // Parte de arquivo vazia (nenhum arquivo selecionado) é ignorada.
                if dados.is_empty() {
                    continue;
                }
                let extensao = detectar_extensao(&dados).ok_or_else(|| {
                    ApiError::Validacao(
                        "Formato de imagem não suportado. Use JPEG, PNG ou GIF.".to_string(),
                    )
                })?;
                form.arquivo = Some((extensao, dados));
            }
            outro => {
                let texto = String::from_utf8(dados).map_err(|_| {
                    ApiError::Validacao(format!("Campo '{}' não é texto válido.", outro))
                })?;
                let texto = texto.trim().to_string();
                if texto.is_empty() {
                    continue;
                }
                match outro {
                    "nome" => form.nome = Some(texto),
                    "genero" => form.genero = Some(texto),
                    "imagemUrl" => form.imagem_url = Some(texto),
                    "ano" => {
                        let ano = texto.parse::<i32>().map_err(|_| {
                            ApiError::Validacao("Ano inválido.".to_string())
                        })?;
                        form.ano = Some(ano);
                    }
                    "privado" => {
                        form.privado = Some(texto == "true" || texto == "1");
                    }
                    // Campos desconhecidos do formulário são ignorados.
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

/// Grava a imagem no diretório de uploads com um nome aleatório e devolve o
/// caminho relativo servido estaticamente (ex.: /uploads/abc123.png).
pub async fn salvar_imagem(
    diretorio: &str,
    extensao: &str,
    dados: Vec<u8>,
) -> Result<String, ApiError> {
    let nome_arquivo = nome_arquivo_aleatorio(extensao);
    let caminho: PathBuf = Path::new(diretorio).join(&nome_arquivo);

    web::block(move || std::fs::write(caminho, dados))
        .await
        .map_err(|e| {
            log::error!("Tarefa de gravação de imagem cancelada: {:?}", e);
            ApiError::Interno
        })?
        .map_err(|e| {
            log::error!("Erro ao gravar imagem em disco: {:?}", e);
            ApiError::Interno
        })?;

    Ok(format!("/uploads/{}", nome_arquivo))
}

/// Resolve a origem da imagem do formulário: arquivo enviado tem precedência,
/// depois a URL externa. `obrigatoria` distingue criação (exige imagem) de
/// atualização (imagem opcional).
pub async fn resolver_imagem(
    form: &mut FormJogo,
    diretorio: &str,
    obrigatoria: bool,
) -> Result<Option<String>, ApiError> {
    if let Some((extensao, dados)) = form.arquivo.take() {
        return Ok(Some(salvar_imagem(diretorio, extensao, dados).await?));
    }
    if let Some(url) = form.imagem_url.take() {
        return Ok(Some(url));
    }
    if obrigatoria {
        return Err(ApiError::Validacao(
            "Envie uma imagem ou informe a URL da imagem.".to_string(),
        ));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detecta_jpeg_png_e_gif_pelos_magic_bytes() {
        assert_eq!(detectar_extensao(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]), Some("jpg"));
        assert_eq!(detectar_extensao(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]), Some("png"));
        assert_eq!(detectar_extensao(b"GIF89a..."), Some("gif"));
        assert_eq!(detectar_extensao(b"GIF87a..."), Some("gif"));
    }

    #[test]
    fn rejeita_formatos_desconhecidos() {
        assert_eq!(detectar_extensao(b"<svg xmlns="), None);
        assert_eq!(detectar_extensao(b"%PDF-1.4"), None);
        assert_eq!(detectar_extensao(&[]), None);
    }

    #[test]
    fn limite_de_5mb_vale_somente_para_o_campo_de_imagem() {
        let (limite_imagem, mensagem_imagem) = limite_do_campo("imagem");
        assert_eq!(limite_imagem, TAMANHO_MAX_IMAGEM);
        assert!(mensagem_imagem.contains("5MB"));

        for campo in ["nome", "ano", "genero", "imagemUrl", "privado"] {
            let (limite, mensagem) = limite_do_campo(campo);
            assert_eq!(limite, TAMANHO_MAX_CAMPO_TEXTO);
            assert!(!mensagem.contains("imagem"));
        }
    }

    #[test]
    fn nome_de_arquivo_carrega_a_extensao_detectada() {
        let nome = nome_arquivo_aleatorio("png");
        assert!(nome.ends_with(".png"));
        assert_eq!(nome.len(), 16 + ".png".len());
    }

    #[actix_web::test]
    async fn resolver_imagem_exige_uma_das_origens_na_criacao() {
        let mut form = FormJogo::default();
        let erro = resolver_imagem(&mut form, "uploads", true).await.unwrap_err();
        assert!(matches!(erro, ApiError::Validacao(_)));
    }

    #[actix_web::test]
    async fn resolver_imagem_aceita_url_externa() {
        let mut form = FormJogo {
            imagem_url: Some("https://exemplo.com/capa.png".to_string()),
            ..FormJogo::default()
        };
        let imagem = resolver_imagem(&mut form, "uploads", true).await.unwrap();
        assert_eq!(imagem.as_deref(), Some("https://exemplo.com/capa.png"));
    }

    #[actix_web::test]
    async fn resolver_imagem_e_opcional_na_atualizacao() {
        let mut form = FormJogo::default();
        let imagem = resolver_imagem(&mut form, "uploads", false).await.unwrap();
        assert!(imagem.is_none());
    }
}

// src/shared/shared_structs.rs

use serde::Serialize;

/// Tipo do toast exibido pelo cliente ao receber a resposta de uma mutação.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TipoToast {
    Success,
    Error,
    Info,
    Warning,
}

/// Notificação transitória devolvida junto com o corpo das mutações.
#[derive(Serialize, Debug, Clone)]
pub struct Toast {
    pub message: String,
    #[serde(rename = "type")]
    pub tipo: TipoToast,
}

impl Toast {
    pub fn sucesso(message: impl Into<String>) -> Self {
        Toast { message: message.into(), tipo: TipoToast::Success }
    }

    pub fn erro(message: impl Into<String>) -> Self {
        Toast { message: message.into(), tipo: TipoToast::Error }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Toast { message: message.into(), tipo: TipoToast::Info }
    }
}

/// Envelope padrão das respostas de mutação da API.
/// O payload (quando houver) é achatado no nível raiz do JSON e o toast
/// acompanha como campo `toast`, para o cliente exibir a notificação.
/// 'T' precisa serializar como objeto JSON.
#[derive(Serialize)]
pub struct RespostaApi<T: Serialize> {
    #[serde(flatten)]
    pub body: Option<T>,
    pub toast: Toast,
}

impl<T: Serialize> RespostaApi<T> {
    pub fn sucesso(message: impl Into<String>, body: T) -> Self {
        RespostaApi { body: Some(body), toast: Toast::sucesso(message) }
    }
}

impl RespostaApi<()> {
    /// Resposta de mutação sem payload, apenas o toast.
    pub fn somente_toast(toast: Toast) -> Self {
        RespostaApi { body: None, toast }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_achata_payload_e_inclui_toast() {
        #[derive(Serialize)]
        struct Corpo {
            id: i32,
        }

        let resposta = RespostaApi::sucesso("Jogo criado com sucesso!", Corpo { id: 7 });
        let json = serde_json::to_value(&resposta).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["toast"]["message"], "Jogo criado com sucesso!");
        assert_eq!(json["toast"]["type"], "success");
    }

    #[test]
    fn envelope_sem_payload_serializa_somente_toast() {
        let resposta = RespostaApi::somente_toast(Toast::erro("Credenciais inválidas."));
        let json = serde_json::to_value(&resposta).unwrap();

        assert_eq!(json["toast"]["type"], "error");
        assert!(json.get("body").is_none());
    }
}

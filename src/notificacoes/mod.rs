// src/notificacoes/mod.rs

// Declara o submódulo com o contrato e as implementações do notificador de e-mail
pub mod notificador;

// src/shared/mod.rs

// Declara o submódulo com as structs compartilhadas (envelope de resposta/toast)
pub mod shared_structs;
// Declara o submódulo com o tipo de erro da API
pub mod api_error;
// Declara o submódulo de configuração lida do ambiente
pub mod config;

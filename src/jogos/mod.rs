// src/jogos/mod.rs

// Declara o submódulo que contém as definições das structs de jogos
pub mod jogo_structs;
// Declara o submódulo que contém as funções de rota relacionadas a jogos
pub mod jogo_router;
// Declara o submódulo de leitura do formulário multipart e gravação de imagens
pub mod upload;

use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Configuração do servidor
///
/// # Variáveis de ambiente
///
/// | Variável | Padrão | Descrição |
/// |----------|--------|-----------|
/// | WORK_DIR | /var/lib/dica | diretório de trabalho |
/// | HTTP_PORT | 3000 | porta HTTP da API |
/// | ENVIRONMENT | development | ambiente de execução |
/// | MAX_UPLOAD_MB | 10 | tamanho máximo de anexo (MB) |
/// | AUDIT_BUFFER_SIZE | 256 | buffer do canal de auditoria |
///
/// # Exemplo
///
/// ```ignore
/// WORK_DIR=/data/dica HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Diretório de trabalho: banco, uploads, logs
    pub work_dir: String,
    /// Porta HTTP da API
    pub http_port: u16,
    /// Configuração JWT
    pub jwt: JwtConfig,
    /// Ambiente: development | staging | production
    pub environment: String,
    /// Tamanho máximo de upload em bytes
    pub max_upload_bytes: usize,
    /// Tamanho do buffer do canal de auditoria
    pub audit_buffer_size: usize,
}

impl Config {
    /// Carrega a configuração do ambiente (com defaults)
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/dica".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            max_upload_bytes: std::env::var("MAX_UPLOAD_MB")
                .ok()
                .and_then(|p| p.parse::<usize>().ok())
                .unwrap_or(10)
                * 1024
                * 1024,
            audit_buffer_size: std::env::var("AUDIT_BUFFER_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(256),
        }
    }

    /// Overrides pontuais (cenários de teste)
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Diretório do banco de dados
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Diretório dos arquivos enviados
    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    /// Diretório de logs
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Garante a estrutura de diretórios do work_dir
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.uploads_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// Ambiente de produção?
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Ambiente de desenvolvimento?
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

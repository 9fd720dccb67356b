// src/services/file_store.rs

use std::path::PathBuf;

use anyhow::Context;
use uuid::Uuid;

use crate::common::error::AppError;

pub const PURCHASE_ORDER_DIR: &str = "purchase_orders";
pub const PROFILE_IMAGE_DIR: &str = "profile_images";
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Arquivos enviados ficam em `MEDIA_ROOT/<pasta>/<uuid>-<nome>`.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Grava e devolve o caminho relativo (é o que vai para o banco).
    pub async fn save(&self, folder: &str, original_name: &str, bytes: &[u8]) -> Result<String, AppError> {
        let relative = format!("{}/{}-{}", folder, Uuid::new_v4(), sanitize_file_name(original_name));
        let path = self.root.join(&relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Falha ao criar {}", parent.display()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Falha ao gravar {}", path.display()))?;

        Ok(relative)
    }

    /// Remoção best-effort: erro só vai para o log.
    pub async fn remove(&self, relative: &str) {
        let path = self.root.join(relative);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Não foi possível remover {}: {}", path.display(), e);
        }
    }
}

/// Mantém só o nome base, com caracteres seguros.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

pub fn check_image_size(len: usize) -> Result<(), AppError> {
    if len > MAX_IMAGE_BYTES {
        return Err(AppError::field("image", "Image size should not exceed 5MB."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_lose_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\PO 118.pdf"), "PO_118.pdf");
        assert_eq!(sanitize_file_name(".."), "upload");
    }

    #[test]
    fn image_limit_is_five_megabytes() {
        assert!(check_image_size(MAX_IMAGE_BYTES).is_ok());
        assert!(check_image_size(MAX_IMAGE_BYTES + 1).is_err());
    }

    #[tokio::test]
    async fn saved_file_lands_under_the_folder() {
        let root = std::env::temp_dir().join(format!("media-test-{}", Uuid::new_v4()));
        let store = FileStore::new(&root);

        let relative = store.save(PURCHASE_ORDER_DIR, "po.pdf", b"%PDF").await.unwrap();
        assert!(relative.starts_with("purchase_orders/"));
        assert!(relative.ends_with("-po.pdf"));
        assert_eq!(tokio::fs::read(root.join(&relative)).await.unwrap(), b"%PDF");

        store.remove(&relative).await;
        assert!(!root.join(&relative).exists());
        let _ = std::fs::remove_dir_all(root);
    }
}

// src/common/form.rs

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::{common::error::AppError, models::purchase_order::UploadedFile};

/// Campos de um formulário multipart: textos por nome e, no máximo, um arquivo.
#[derive(Debug, Default)]
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl FormData {
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}

/// Lê o multipart inteiro; `file_field` é o único campo tratado como arquivo.
pub async fn read_multipart(mut multipart: Multipart, file_field: &str) -> Result<FormData, AppError> {
    let mut form = FormData::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::non_field(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == file_field {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::field(file_field, e.body_text()))?;
            // Campo de arquivo vazio equivale a não enviar
            if !bytes.is_empty() {
                form.file = Some(UploadedFile { file_name, bytes: bytes.to_vec() });
            }
        } else {
            let value = field.text().await.map_err(|e| AppError::field(&name, e.body_text()))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

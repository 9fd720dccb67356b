// src/services/series_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::SeriesRepository,
    models::series::{CreateSeriesPayload, NumberSeries, UpdateSeriesPayload},
};

#[derive(Clone)]
pub struct SeriesService {
    repo: SeriesRepository,
}

impl SeriesService {
    pub fn new(repo: SeriesRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<NumberSeries>, AppError> {
        self.repo.list(search).await
    }

    pub async fn get(&self, id: i64) -> Result<NumberSeries, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Series"))
    }

    pub async fn create(&self, payload: CreateSeriesPayload) -> Result<NumberSeries, AppError> {
        payload.validate()?;
        self.repo
            .create(payload.series_name.trim(), payload.prefix.trim(), payload.current_sequence)
            .await
    }

    /// A sequência só anda para frente: números já emitidos não voltam a ser usados.
    pub async fn update(&self, id: i64, payload: UpdateSeriesPayload) -> Result<NumberSeries, AppError> {
        payload.validate()?;

        let mut tx = self.repo.pool().begin().await?;
        let current = self
            .repo
            .lock(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Series"))?;

        let current_sequence = next_sequence(current.current_sequence, payload.current_sequence)?;
        let series_name = payload.series_name.unwrap_or(current.series_name);
        let prefix = payload.prefix.unwrap_or(current.prefix);

        let updated = self
            .repo
            .update(&mut *tx, id, series_name.trim(), prefix.trim(), current_sequence)
            .await?
            .ok_or(AppError::NotFound("Series"))?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        match self.repo.delete(id).await? {
            0 => Err(AppError::NotFound("Series")),
            _ => Ok(()),
        }
    }
}

/// Valor final do contador num update; recuar é erro de validação.
pub fn next_sequence(current: i64, requested: Option<i64>) -> Result<i64, AppError> {
    match requested {
        Some(value) if value < current => Err(AppError::field(
            "current_sequence",
            format!("Ensure this value is greater than or equal to {current}."),
        )),
        Some(value) => Ok(value),
        None => Ok(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_cannot_move_backwards() {
        match next_sequence(3, Some(0)) {
            Err(AppError::FieldValidation(errors)) => assert_eq!(
                errors["current_sequence"],
                vec!["Ensure this value is greater than or equal to 3.".to_string()]
            ),
            other => panic!("expected current_sequence error, got {other:?}"),
        }
    }

    #[test]
    fn sequence_can_stay_or_advance() {
        assert_eq!(next_sequence(3, None).unwrap(), 3);
        assert_eq!(next_sequence(3, Some(3)).unwrap(), 3);
        assert_eq!(next_sequence(3, Some(10)).unwrap(), 10);
    }
}

//! Batched loaders used to fill eager-loaded relations.
//!
//! Each loader issues one `IN (...)` query for the whole result page so a
//! read with includes costs one extra round trip per relation.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::{DiseaseHistory, Medicine, Metrics, Treatment, UserInfo};

use super::models::{DiseaseHistoryRow, MedicineRow, MetricsRow, TreatmentRow, UserInfoRow};
use super::schema::{disease_histories, medicines, metrics, treatments, user_infos};

fn distinct(ids: impl IntoIterator<Item = i32>) -> Vec<i32> {
    let mut ids: Vec<i32> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub(crate) async fn medicines_by_id(
    conn: &mut AsyncPgConnection,
    ids: impl IntoIterator<Item = i32>,
) -> QueryResult<HashMap<i32, Medicine>> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<MedicineRow> = medicines::table
        .filter(medicines::id.eq_any(ids))
        .select(MedicineRow::as_select())
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(|row| (row.id, row.into())).collect())
}

pub(crate) async fn histories_by_id(
    conn: &mut AsyncPgConnection,
    ids: impl IntoIterator<Item = i32>,
) -> QueryResult<HashMap<i32, DiseaseHistory>> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<DiseaseHistoryRow> = disease_histories::table
        .filter(disease_histories::id.eq_any(ids))
        .select(DiseaseHistoryRow::as_select())
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(|row| (row.id, row.into())).collect())
}

pub(crate) async fn profiles_by_id(
    conn: &mut AsyncPgConnection,
    ids: impl IntoIterator<Item = i32>,
) -> QueryResult<HashMap<i32, UserInfo>> {
    let ids = distinct(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<UserInfoRow> = user_infos::table
        .filter(user_infos::id.eq_any(ids))
        .select(UserInfoRow::as_select())
        .load(conn)
        .await?;
    Ok(rows.into_iter().map(|row| (row.id, row.into())).collect())
}

/// Treatments grouped by disease history, each group ordered by id.
pub(crate) async fn treatments_by_history(
    conn: &mut AsyncPgConnection,
    history_ids: impl IntoIterator<Item = i32>,
) -> QueryResult<HashMap<i32, Vec<Treatment>>> {
    let ids = distinct(history_ids);
    let mut grouped: HashMap<i32, Vec<Treatment>> = HashMap::new();
    if ids.is_empty() {
        return Ok(grouped);
    }
    let rows: Vec<TreatmentRow> = treatments::table
        .filter(treatments::disease_history_id.eq_any(ids))
        .order(treatments::id.asc())
        .select(TreatmentRow::as_select())
        .load(conn)
        .await?;
    for row in rows {
        grouped
            .entry(row.disease_history_id)
            .or_default()
            .push(row.into());
    }
    Ok(grouped)
}

/// Metric readings grouped by disease history, each group ordered by id.
pub(crate) async fn metrics_by_history(
    conn: &mut AsyncPgConnection,
    history_ids: impl IntoIterator<Item = i32>,
) -> QueryResult<HashMap<i32, Vec<Metrics>>> {
    let ids = distinct(history_ids);
    let mut grouped: HashMap<i32, Vec<Metrics>> = HashMap::new();
    if ids.is_empty() {
        return Ok(grouped);
    }
    let rows: Vec<MetricsRow> = metrics::table
        .filter(metrics::disease_history_id.eq_any(ids))
        .order(metrics::id.asc())
        .select(MetricsRow::as_select())
        .load(conn)
        .await?;
    for row in rows {
        grouped
            .entry(row.disease_history_id)
            .or_default()
            .push(row.into());
    }
    Ok(grouped)
}

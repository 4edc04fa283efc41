//! Render model shared by the front ends: maps a [`RequestState`] to what the
//! user sees.

use shared::protocol::{SegmentationResult, Statistics};

use crate::{controller::RequestState, UrlResolver};

pub const LOADING_HEADLINE: &str = "Processando imagem...";
pub const LOADING_HINT: &str = "Isso pode levar alguns segundos";

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Idle,
    Loading {
        headline: &'static str,
        hint: &'static str,
    },
    Error(String),
    Result(ResultView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub nuclei_count: u32,
    pub image_name: String,
    pub stats: Vec<StatRow>,
    pub result_image_url: String,
    pub histogram_url: String,
}

pub fn render(state: &RequestState, resolver: &impl UrlResolver) -> Panel {
    match state {
        RequestState::Idle => Panel::Idle,
        RequestState::Loading => Panel::Loading {
            headline: LOADING_HEADLINE,
            hint: LOADING_HINT,
        },
        RequestState::Failed(message) => Panel::Error(message.clone()),
        RequestState::Succeeded(result) => Panel::Result(result_view(result, resolver)),
    }
}

pub fn result_view(result: &SegmentationResult, resolver: &impl UrlResolver) -> ResultView {
    ResultView {
        nuclei_count: result.nuclei_count,
        image_name: result.image_name.clone(),
        stats: stat_rows(&result.statistics),
        result_image_url: resolver.resolve_url(&result.result_image_url),
        histogram_url: resolver.resolve_url(&result.histogram_url),
    }
}

pub fn stat_rows(stats: &Statistics) -> Vec<StatRow> {
    let row = |label: &'static str, value: String| StatRow { label, value };
    vec![
        row("Área Média", format!("{:.2}", stats.mean_area)),
        row("Área Mediana", format!("{:.2}", stats.median_area)),
        row("Área Mínima", stats.min_area.to_string()),
        row("Área Máxima", stats.max_area.to_string()),
        row("Desvio Padrão", format!("{:.2}", stats.std_area)),
        row("Diâmetro Médio", format!("{:.2}", stats.mean_diameter)),
        row("Solidez Média", format!("{:.4}", stats.mean_solidity)),
    ]
}

pub fn submit_label(is_loading: bool) -> &'static str {
    if is_loading {
        "Processando..."
    } else {
        "Enviar para Análise"
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;

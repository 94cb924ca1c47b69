use eframe::egui::{self, Align2, Color32, FontId, RichText, ScrollArea, Sense, Ui};

use ranking_dashboard::color::{GradientScale, text_color_for};
use ranking_dashboard::report::departments::{self, DepartmentSummary};
use ranking_dashboard::report::format::format_total;
use ranking_dashboard::report::kpi::KpiSet;
use ranking_dashboard::report::ranking::{self, RankedRow};

use crate::state::AppState;

const GRADED_CELL_SIZE: egui::Vec2 = egui::vec2(140.0, 20.0);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render title, KPI tiles and both tables.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    title(ui, state);

    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Abra un archivo de avance  (Archivo → Abrir…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            kpi_tiles(ui, &view.kpis);
            ui.separator();

            ui.heading("🏆 Ranking por Proyección Total");
            ranking_table(ui, &view.ranking);
            ui.add_space(12.0);

            ui.heading("📍 Proyección por Departamento (Resumen General)");
            department_table(ui, &view.departments);
        });
}

fn title(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if let Some(path) = &state.config.logo {
            ui.add(egui::Image::new(format!("file://{}", path.display())).max_width(120.0));
        }
        ui.heading(RichText::new("Proyección, Ranking y Ganadores").size(26.0).strong());
    });
    ui.add_space(6.0);
}

// ---------------------------------------------------------------------------
// KPI tiles
// ---------------------------------------------------------------------------

fn kpi_tiles(ui: &mut Ui, kpis: &KpiSet) {
    let tiles = kpis.tiles();
    ui.columns(tiles.len(), |columns: &mut [Ui]| {
        for (col, (caption, value)) in columns.iter_mut().zip(tiles) {
            col.group(|ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(RichText::new(caption).size(14.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(28.0).strong());
                });
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Ranking table
// ---------------------------------------------------------------------------

fn ranking_table(ui: &mut Ui, rows: &[RankedRow]) {
    if rows.is_empty() {
        ui.label("Sin registros para los filtros seleccionados.");
        return;
    }

    egui::Grid::new("ranking_table")
        .striped(true)
        .num_columns(ranking::HEADERS.len())
        .spacing([16.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            for header in ranking::HEADERS {
                ui.strong(header);
            }
            ui.end_row();

            for row in rows {
                ui.label(&row.rank_label);
                ui.label(&row.id);
                ui.label(&row.name);
                ui.label(&row.department);
                ui.label(&row.cluster);
                ui.label(&row.equivalent_pct);
                ui.label(&row.pp_pct);
                ui.label(format_total(row.total_pp));
                ui.label(format_total(row.total_ss));
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Department summary table
// ---------------------------------------------------------------------------

fn department_table(ui: &mut Ui, rows: &[DepartmentSummary]) {
    if rows.is_empty() {
        ui.label("Sin datos por departamento.");
        return;
    }

    let scale = GradientScale::from_values(rows.iter().map(|r| r.equivalent_pct));
    let pct = |v: Option<f64>| v.map(|v| format!("{v:.1}%")).unwrap_or_default();

    egui::Grid::new("department_table")
        .striped(true)
        .num_columns(departments::HEADERS.len())
        .spacing([16.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            for header in departments::HEADERS {
                ui.strong(header);
            }
            ui.end_row();

            for row in rows {
                ui.label(&row.department);
                ui.label(pct(row.pp_pct));
                ui.label(pct(row.ss_pct));
                match scale.and_then(|s| s.color_for(row.equivalent_pct)) {
                    Some(bg) => graded_cell(ui, &pct(row.equivalent_pct), bg),
                    None => {
                        ui.label(pct(row.equivalent_pct));
                    }
                }
                ui.end_row();
            }
        });
}

/// A fixed-size cell filled with `bg` and centered text.
fn graded_cell(ui: &mut Ui, text: &str, bg: Color32) {
    let (response, painter) = ui.allocate_painter(GRADED_CELL_SIZE, Sense::hover());
    painter.rect_filled(response.rect, 2.0, bg);
    painter.text(
        response.rect.center(),
        Align2::CENTER_CENTER,
        text,
        FontId::proportional(13.0),
        text_color_for(bg),
    );
}

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use ranking_dashboard::data::filter::{Constraint, TopN};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    if let Some(path) = &state.config.sidebar_image {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(format!("file://{}", path.display()))
                    .max_width(ui.available_width() * 0.9)
                    .max_height(140.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading("Filtros");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No hay datos cargados.");
        return;
    }

    // Edit a copy so the view is recomputed once per change.
    let mut selection = state.selection.clone();
    let departments = state.options.department_choices();
    let clusters = state.options.cluster_choices();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Departamento");
            choice_combo(ui, "department_filter", &mut selection.department, &departments);
            ui.add_space(6.0);

            ui.strong("Cluster");
            choice_combo(ui, "cluster_filter", &mut selection.cluster, &clusters);
            ui.add_space(6.0);

            ui.checkbox(&mut selection.winners_only, "Mostrar solo ganadores");
            ui.add_space(6.0);

            let mut top_n = selection.top_n.get() as i64;
            ui.add(
                egui::Slider::new(&mut top_n, TopN::MIN as i64..=TopN::MAX as i64)
                    .text("Top Ranking"),
            );
            selection.top_n = TopN::clamped(top_n);
        });

    state.set_selection(selection);
}

fn choice_combo(ui: &mut Ui, id: &str, current: &mut Constraint, choices: &[Constraint]) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for choice in choices {
                ui.selectable_value(current, choice.clone(), choice.label());
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Archivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let has_view = state.view.is_some();
            if ui
                .add_enabled(has_view, egui::Button::new("Exportar ranking…"))
                .clicked()
            {
                if let Some(path) = save_csv_dialog("ranking.csv") {
                    state.export_ranking(&path);
                }
                ui.close_menu();
            }
            if ui
                .add_enabled(has_view, egui::Button::new("Exportar departamentos…"))
                .clicked()
            {
                if let Some(path) = save_csv_dialog("departamentos.csv") {
                    state.export_departments(&path);
                }
                ui.close_menu();
            }
        });

        if ui.button("🔄 Recargar").clicked() {
            state.reload();
        }

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
            ui.label(format!(
                "{} registros cargados, {} visibles · {}",
                ds.len(),
                view.filtered_count,
                state.source_name()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir datos de avance")
        .add_filter(
            "Archivos soportados",
            &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_source(path);
    }
}

fn save_csv_dialog(default_name: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title("Exportar CSV")
        .set_file_name(default_name)
        .add_filter("CSV", &["csv"])
        .save_file()
}

//! Immediate-mode UI: the settings panel and the interactive key grid.

use egui::{
    Align2, Color32, Context, CornerRadius, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2,
};
use keyplane_core::input::{DELETE_CONTROL_SIZE, RESIZE_HANDLE_SIZE};
use keyplane_core::{
    Cell, GRID_PADDING, GridConfig, LayoutEditor, PointerEvent, classify_point, geometry,
};
use kurbo::Point;

/// Accent color for hover feedback.
const ACCENT: Color32 = Color32::from_rgb(120, 140, 255);

/// UI-side state: the slider values before clamping.
pub struct UiState {
    pub rows: u32,
    pub columns: u32,
    pub gap: f64,
}

impl UiState {
    pub fn from_config(config: &GridConfig) -> Self {
        Self {
            rows: config.rows,
            columns: config.columns,
            gap: config.gap,
        }
    }
}

/// Render the whole UI for one frame.
pub fn render_ui(ctx: &Context, editor: &mut LayoutEditor, ui_state: &mut UiState) {
    egui::SidePanel::left("grid_settings")
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.heading("Grid Settings");
            ui.add_space(8.0);

            ui.add(egui::Slider::new(&mut ui_state.rows, 1..=10).text("Rows"));
            ui.add(egui::Slider::new(&mut ui_state.columns, 1..=15).text("Columns"));
            ui.add(
                egui::Slider::new(&mut ui_state.gap, 0.0..=20.0)
                    .step_by(2.0)
                    .text("Gap"),
            );

            ui.add_space(12.0);
            ui.separator();
            ui.label(
                egui::RichText::new("Instructions")
                    .size(11.0)
                    .color(Color32::from_gray(100)),
            );
            ui.label("Click + to add keys");
            ui.label("Drag keys to move them");
            ui.label("Use the corner handle to resize");
            ui.label("Click x to delete keys");
        });

    // The sliders feed the engine through the clamping constructor; existing
    // keys are re-fitted by the editor when the grid shrinks.
    let config = GridConfig::clamped(ui_state.rows, ui_state.columns, ui_state.gap);
    if config != *editor.config() {
        editor.set_config(config);
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::both().show(ui, |ui| {
            grid_view(ui, editor);
        });
    });
}

/// Convert a screen position to grid-local pixels.
fn to_local(origin: Pos2, pos: Pos2) -> Point {
    Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
}

/// Convert a grid-local pixel rectangle to screen coordinates.
fn to_screen(origin: Pos2, rect: kurbo::Rect) -> Rect {
    Rect::from_min_size(
        origin + Vec2::new(rect.x0 as f32, rect.y0 as f32),
        Vec2::new(rect.width() as f32, rect.height() as f32),
    )
}

/// The interactive grid: routes pointer events into the editor, then paints
/// the current layout.
fn grid_view(ui: &mut egui::Ui, editor: &mut LayoutEditor) {
    let config = *editor.config();
    let grid_size = geometry::grid_size(&config);
    let padding = GRID_PADDING as f32;
    let desired = Vec2::new(
        grid_size.width as f32 + 2.0 * padding,
        grid_size.height as f32 + 2.0 * padding,
    );
    let (response, painter) = ui.allocate_painter(desired, Sense::click_and_drag());
    let origin = response.rect.min + Vec2::new(padding, padding);

    route_pointer(ui, &response, origin, editor);

    let occupied = editor.occupied_cells();
    let hover = response.hover_pos();

    // Empty cells show the add affordance; occupied cells draw nothing,
    // the covering key paints on top of them.
    for row in 0..config.rows {
        for col in 0..config.columns {
            let cell = Cell::new(col, row);
            if occupied.contains(&cell) {
                continue;
            }
            let rect = to_screen(origin, geometry::cell_rect(&config, cell));
            let hovered = hover.is_some_and(|pos| rect.contains(pos));
            let color = if hovered { ACCENT } else { Color32::from_gray(200) };
            painter.rect_stroke(
                rect,
                CornerRadius::same(4),
                Stroke::new(1.0, color),
                StrokeKind::Inside,
            );
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "+",
                FontId::proportional(20.0),
                color,
            );
        }
    }

    // Keys in insertion order: later keys paint on top of earlier ones,
    // matching the hit-testing order in the core.
    for key in editor.keys() {
        let rect = to_screen(
            origin,
            geometry::footprint_rect(&config, key.origin(), key.width, key.height),
        );
        painter.rect_filled(rect, CornerRadius::same(6), Color32::WHITE);
        painter.rect_stroke(
            rect,
            CornerRadius::same(6),
            Stroke::new(1.0, Color32::from_gray(140)),
            StrokeKind::Inside,
        );
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            &key.label,
            FontId::proportional(14.0),
            Color32::from_gray(50),
        );

        // Controls only appear on hover; classify_point still hit-tests them
        // regardless, so the regions stay stable while the pointer settles.
        let hovered = hover.is_some_and(|pos| rect.contains(pos));
        if hovered {
            let delete = Rect::from_min_size(
                Pos2::new(rect.max.x - DELETE_CONTROL_SIZE as f32, rect.min.y),
                Vec2::splat(DELETE_CONTROL_SIZE as f32),
            );
            painter.circle_filled(delete.center(), 6.0, Color32::from_rgb(220, 80, 80));
            painter.text(
                delete.center(),
                Align2::CENTER_CENTER,
                "x",
                FontId::proportional(10.0),
                Color32::WHITE,
            );

            let handle = Rect::from_min_size(
                Pos2::new(
                    rect.max.x - RESIZE_HANDLE_SIZE as f32,
                    rect.max.y - RESIZE_HANDLE_SIZE as f32,
                ),
                Vec2::splat(RESIZE_HANDLE_SIZE as f32),
            );
            painter.rect_filled(handle, CornerRadius::same(2), Color32::from_gray(150));
        }
    }
}

/// Forward pointer input to the editor.
///
/// A pointer-down inside the grid is classified against the layout; move and
/// up events are forwarded only while an interaction is active. Forwarding is
/// acquired on interaction start and released on every path back to idle, so
/// stray events between interactions never reach the engine.
fn route_pointer(
    ui: &egui::Ui,
    response: &egui::Response,
    origin: Pos2,
    editor: &mut LayoutEditor,
) {
    let (pressed, released, pos) = ui.input(|input| {
        (
            input.pointer.primary_pressed(),
            input.pointer.primary_released(),
            input.pointer.latest_pos(),
        )
    });
    let local = pos.map(|pos| to_local(origin, pos));

    if pressed && response.hovered() {
        if let Some(position) = local {
            if let Some(target) = classify_point(editor.layout(), editor.config(), position) {
                editor.handle_pointer_event(PointerEvent::Down { position, target });
            }
        }
    } else if editor.is_interacting() {
        if let Some(position) = local {
            editor.handle_pointer_event(PointerEvent::Move { position });
        }
        if released {
            editor.handle_pointer_event(PointerEvent::Up {
                position: local.unwrap_or(Point::ZERO),
            });
        }
    }
}

use egui::{Color32, RichText};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
}

/// A message the user has to acknowledge
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            NoticeKind::Info => "Alarm Set",
            NoticeKind::Warning => "Warning",
        }
    }
}

pub fn render_notice_dialog(ctx: &egui::Context, notice: &mut Option<Notice>) {
    let Some(current) = notice.as_ref() else {
        return;
    };

    let title = current.title();
    let text = current.text.clone();
    let color = match current.kind {
        NoticeKind::Info => None,
        NoticeKind::Warning => Some(Color32::from_rgb(255, 165, 0)),
    };

    // Modal: the main panel stays blocked until the notice is acknowledged
    let response = egui::Modal::new(egui::Id::new("notice_dialog")).show(ctx, |ui| {
        ui.set_min_width(240.0);
        ui.heading(title);
        ui.add_space(8.0);
        let mut label = RichText::new(&text);
        if let Some(color) = color {
            label = label.color(color);
        }
        ui.label(label);
        ui.add_space(12.0);

        ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
            ui.button("OK").clicked()
        })
        .inner
    });

    // OK, Escape, or a click on the backdrop
    if response.inner || response.should_close() {
        *notice = None;
    }
}

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use async_channel::{Receiver, Sender, unbounded};
use eframe::egui;
use egui::load::SizedTexture;
use image_caption::core::image_file::sniff_mime_type;
use image_caption::core::{ImageFile, Thumbnail};
use image_caption::view::{self, ViewModel};
use image_caption::{AppEvent, CaptionApp, CaptionResult};
use tokio::runtime::Runtime;

const PREVIEW_HEIGHT: f32 = 240.0;
const TILE_EDGE: f32 = 96.0;
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

/// What the user asked for during one frame, applied once drawing is done.
enum Intent {
    Browse,
    Generate,
    Clear,
    Copy,
}

struct CaptionDesktopApp {
    app: CaptionApp,
    runtime: Runtime,
    result_tx: Sender<CaptionResult<String>>,
    result_rx: Receiver<CaptionResult<String>>,
    /// GPU textures keyed by preview URL.
    textures: HashMap<String, egui::TextureHandle>,
}

impl CaptionDesktopApp {
    fn new(_cc: &eframe::CreationContext<'_>, app: CaptionApp, runtime: Runtime) -> Self {
        let (result_tx, result_rx) = unbounded();
        Self {
            app,
            runtime,
            result_tx,
            result_rx,
            textures: HashMap::new(),
        }
    }

    fn browse(&mut self, ctx: &egui::Context) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        let event = match ImageFile::from_path(&path) {
            Ok(file) => AppEvent::FileSelected(file),
            Err(err) => AppEvent::IntakeFailed(err),
        };
        self.app.dispatch(event);
        self.warm_preview(ctx);
    }

    /// Only the first dropped file is considered.
    fn take_dropped_files(&mut self, ctx: &egui::Context) {
        let Some(first) = ctx.input(|i| i.raw.dropped_files.first().cloned()) else {
            return;
        };
        let event = match read_dropped(first) {
            Ok(file) => AppEvent::FileDropped(vec![file]),
            Err(err) => AppEvent::IntakeFailed(err),
        };
        self.app.dispatch(event);
        self.warm_preview(ctx);
    }

    /// Decode the current thumbnail on the blocking pool so drawing never waits.
    fn warm_preview(&self, ctx: &egui::Context) {
        let Some(selected) = self.app.state().selected() else {
            return;
        };
        let preview = Arc::clone(selected.preview());
        if preview.ready_thumbnail().is_some() {
            return;
        }
        let ctx = ctx.clone();
        self.runtime.spawn_blocking(move || {
            preview.thumbnail();
            ctx.request_repaint();
        });
    }

    fn generate(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.app.dispatch(AppEvent::GenerateRequested) else {
            return;
        };
        let tx = self.result_tx.clone();
        let ctx = ctx.clone();
        self.runtime.spawn(async move {
            let result = pending.send().await;
            if tx.send(result).await.is_err() {
                tracing::debug!("window closed before the caption arrived");
            }
            ctx.request_repaint();
        });
    }

    fn apply(&mut self, ctx: &egui::Context, intent: Intent) {
        match intent {
            Intent::Browse => self.browse(ctx),
            Intent::Generate => self.generate(ctx),
            Intent::Clear => {
                self.app.dispatch(AppEvent::ImageCleared);
            }
            Intent::Copy => {
                self.app.dispatch(AppEvent::CaptionCopied);
            }
        }
    }
}

impl eframe::App for CaptionDesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.app.complete(result);
        }
        self.take_dropped_files(ctx);

        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let mut intents = Vec::new();

        {
            let Self { app, textures, .. } = self;
            let model = app.view();

            egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.hyperlink_to(view::FOOTER_TEXT, view::FOOTER_URL);
                });
            });

            egui::CentralPanel::default().show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading(view::TITLE);
                        ui.label(view::SUBTITLE);
                    });
                    ui.add_space(12.0);

                    draw_image_area(ui, &model, textures, hovering, &mut intents);
                    ui.add_space(8.0);

                    ui.horizontal(|ui| {
                        let button = egui::Button::new(model.generate_label);
                        if ui.add_enabled(model.generate_enabled, button).clicked() {
                            intents.push(Intent::Generate);
                        }
                        if model.loading {
                            ui.spinner();
                        }
                    });

                    if let Some(error) = model.error {
                        let color = ui.visuals().error_fg_color;
                        ui.colored_label(color, error);
                    }

                    if let Some(caption) = model.caption {
                        ui.add_space(8.0);
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.strong(view::RESULT_HEADING);
                                if ui.button(view::COPY_LABEL).clicked() {
                                    intents.push(Intent::Copy);
                                }
                            });
                            ui.label(caption);
                        });
                    }

                    if model.show_history() {
                        ui.add_space(12.0);
                        ui.separator();
                        ui.strong(view::HISTORY_HEADING);
                        draw_history(ui, &model, textures);
                    }
                });
            });

            prune_textures(textures, &model);
        }

        for intent in intents {
            self.apply(ctx, intent);
        }

        if hovering || self.app.state().is_loading() {
            ctx.request_repaint();
        }
    }
}

fn draw_image_area(
    ui: &mut egui::Ui,
    model: &ViewModel<'_>,
    textures: &mut HashMap<String, egui::TextureHandle>,
    hovering: bool,
    intents: &mut Vec<Intent>,
) {
    match model.preview {
        None => {
            let fill = if hovering {
                ui.visuals().selection.bg_fill
            } else {
                ui.visuals().extreme_bg_color
            };
            let response = egui::Frame::group(ui.style())
                .fill(fill)
                .show(ui, |ui| {
                    ui.set_min_size(egui::vec2(ui.available_width(), 160.0));
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.heading("🖼");
                        ui.label(view::UPLOAD_PROMPT);
                        ui.small(view::UPLOAD_HINT);
                    });
                })
                .response
                .interact(egui::Sense::click());
            if response.clicked() {
                intents.push(Intent::Browse);
            }
        }
        Some(preview) => {
            ui.horizontal(|ui| {
                match preview.ready_thumbnail() {
                    Some(thumbnail) => {
                        let texture = texture_for(ui.ctx(), textures, preview.url(), thumbnail);
                        let size = egui::vec2(ui.available_width() - 32.0, PREVIEW_HEIGHT);
                        ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                    }
                    None => {
                        ui.label(model.file_name.unwrap_or_default());
                    }
                }
                let clear = ui.add_enabled(!model.loading, egui::Button::new("×"));
                if clear.on_hover_text("Remove image").clicked() {
                    intents.push(Intent::Clear);
                }
            });
        }
    }
}

fn draw_history(
    ui: &mut egui::Ui,
    model: &ViewModel<'_>,
    textures: &mut HashMap<String, egui::TextureHandle>,
) {
    ui.horizontal_wrapped(|ui| {
        for (index, item) in model.history.iter().enumerate() {
            ui.push_id(index, |ui| {
                ui.group(|ui| {
                    ui.set_width(TILE_EDGE * 1.5);
                    ui.vertical(|ui| {
                        if let Some(thumbnail) = item.preview.ready_thumbnail() {
                            let texture =
                                texture_for(ui.ctx(), textures, item.image_url, thumbnail);
                            let size = egui::vec2(TILE_EDGE * 1.5, TILE_EDGE);
                            ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                        }
                        ui.small(item.caption);
                    });
                });
            });
        }
    });
}

fn texture_for(
    ctx: &egui::Context,
    textures: &mut HashMap<String, egui::TextureHandle>,
    url: &str,
    thumbnail: &Thumbnail,
) -> SizedTexture {
    let handle = textures.entry(url.to_string()).or_insert_with(|| {
        let size = [thumbnail.width as usize, thumbnail.height as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, &thumbnail.rgba);
        ctx.load_texture(url, image, egui::TextureOptions::LINEAR)
    });
    SizedTexture::from_handle(handle)
}

/// Drop textures whose preview is no longer on screen.
fn prune_textures(textures: &mut HashMap<String, egui::TextureHandle>, model: &ViewModel<'_>) {
    textures.retain(|url, _| {
        model.preview.is_some_and(|p| p.url() == url.as_str())
            || model.history.iter().any(|item| item.image_url == url.as_str())
    });
}

fn read_dropped(drop: egui::DroppedFile) -> CaptionResult<ImageFile> {
    if let Some(path) = &drop.path {
        return ImageFile::from_path(path);
    }
    let bytes = drop.bytes.map(|b| b.to_vec()).unwrap_or_default();
    let mime = sniff_mime_type(Some(Path::new(&drop.name)), &bytes);
    Ok(ImageFile::new(drop.name, mime, bytes))
}

fn main() -> anyhow::Result<()> {
    image_caption::logging::init_tracing(std::env::var_os("CAPTION_VERBOSE").is_some());

    let app = CaptionApp::builder()
        .build()
        .map_err(|e| anyhow!(e.user_message()))?;
    let runtime = Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 720.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        view::TITLE,
        options,
        Box::new(move |cc| Box::new(CaptionDesktopApp::new(cc, app, runtime))),
    )
    .map_err(|e| anyhow!("{e}"))
}

use iced::widget::canvas::{Cache, Canvas};
use iced::widget::{button, column, container, row, text, text_input};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;

mod capture;
mod export;
mod gesture;
mod render;
mod state;
mod ui;

use state::entity::{EntityId, Placement};
use state::store::BoothStore;
use state::style::FrameStyle;

/// Main application state
struct Booth {
    /// All live photo entities, stacking order and revisions
    store: BoothStore,
    /// Entity the side panel and gestures currently target
    selected: Option<EntityId>,
    /// Where exported frames are written
    export_dir: PathBuf,
    /// Status message to display to the user
    status: String,
    /// Cached canvas geometry; cleared whenever the store or selection
    /// changes
    canvas_cache: Cache,
    /// Store revision the cache was last drawn at
    seen_revision: u64,
    /// Selection the cache was last drawn with
    seen_selected: Option<EntityId>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User asked to bring a new snapshot into the booth
    AddSnapshot,
    /// Background snapshot load completed
    SnapshotLoaded(Result<capture::Snapshot, String>),
    /// A frame was pressed; select it and raise it to the front
    EntityGrabbed(EntityId),
    /// The gesture controller produced a new placement
    PlacementChanged(EntityId, Placement),
    /// Pointer released; the active gesture is over
    GestureEnded,
    /// Empty backdrop was pressed
    SelectionCleared,
    /// Side panel edited the selected frame's name
    NameChanged(String),
    /// Side panel picked a frame style
    StyleChosen(FrameStyle),
    /// Delete the selected frame
    DeleteSelected,
    /// User picks a different export folder
    ChooseExportDir,
    /// Export only the selected frame
    ExportSelected,
    /// Export every frame on the canvas
    ExportAll,
    /// Background single export completed
    SingleExportDone(Result<String, String>),
    /// Background batch export completed
    BatchExportDone(Result<export::BatchReport, String>),
}

impl Booth {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let export_dir = export::default_export_dir();
        println!("🎪 Snapbooth ready. Exports land in {}", export_dir.display());

        (
            Booth {
                store: BoothStore::new(),
                selected: None,
                export_dir,
                status: "Ready. Add a snapshot to begin.".to_string(),
                canvas_cache: Cache::default(),
                seen_revision: 0,
                seen_selected: None,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::AddSnapshot => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Pick a snapshot")
                    .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "webp"])
                    .pick_file();

                if let Some(path) = file {
                    self.status = format!("Loading {}...", path.display());
                    Task::perform(capture::load_snapshot(path), Message::SnapshotLoaded)
                } else {
                    Task::none()
                }
            }

            Message::SnapshotLoaded(Ok(snapshot)) => {
                let id = self.store.spawn(
                    snapshot.payload,
                    snapshot.width,
                    snapshot.height,
                    snapshot.preview,
                    FrameStyle::Candy,
                );
                self.selected = Some(id);
                self.status = format!("Snapped frame {id}. Drag it around!");
                println!("📸 Captured snapshot as frame {id}");
                Task::none()
            }

            Message::SnapshotLoaded(Err(e)) => {
                // Not fatal: the picker doubles as the retry affordance.
                self.status = format!("⚠️  Capture failed: {e}. Pick a file to retry.");
                Task::none()
            }

            Message::EntityGrabbed(id) => {
                self.selected = Some(id);
                self.store.raise_to_front(id);
                Task::none()
            }

            Message::PlacementChanged(id, placement) => {
                self.store.set_placement(id, placement);
                Task::none()
            }

            Message::GestureEnded => Task::none(),

            Message::SelectionCleared => {
                self.selected = None;
                Task::none()
            }

            Message::NameChanged(name) => {
                if let Some(id) = self.selected {
                    self.store.set_name(id, name);
                }
                Task::none()
            }

            Message::StyleChosen(style) => {
                if let Some(id) = self.selected {
                    self.store.set_style(id, style);
                }
                Task::none()
            }

            Message::DeleteSelected => {
                if let Some(id) = self.selected.take() {
                    self.store.remove(id);
                    self.status = format!("Removed frame {id}.");
                }
                Task::none()
            }

            Message::ChooseExportDir => {
                let folder = FileDialog::new()
                    .set_title("Choose export folder")
                    .pick_folder();

                if let Some(dir) = folder {
                    self.status = format!("Exports will land in {}.", dir.display());
                    self.export_dir = dir;
                }
                Task::none()
            }

            Message::ExportSelected => {
                let entity = self
                    .selected
                    .and_then(|id| self.store.get(id))
                    .cloned();

                if let Some(entity) = entity {
                    self.status = format!("Exporting frame {}...", entity.id);
                    Task::perform(
                        export::export_one(entity, self.export_dir.clone()),
                        Message::SingleExportDone,
                    )
                } else {
                    self.status = "Select a frame to export first.".to_string();
                    Task::none()
                }
            }

            Message::ExportAll => {
                if self.store.is_empty() {
                    self.status = "Nothing to export yet.".to_string();
                    Task::none()
                } else {
                    let entities: Vec<_> =
                        self.store.ordered().into_iter().cloned().collect();
                    self.status = format!("Exporting {} frame(s)...", self.store.len());
                    Task::perform(
                        export::export_all(entities, self.export_dir.clone()),
                        Message::BatchExportDone,
                    )
                }
            }

            Message::SingleExportDone(Ok(path)) => {
                println!("✅ Exported {path}");
                self.status = format!("✅ Saved {path}");
                Task::none()
            }

            Message::SingleExportDone(Err(e)) => {
                self.status = format!("⚠️  Export failed: {e}");
                Task::none()
            }

            Message::BatchExportDone(Ok(report)) => {
                println!(
                    "📊 Batch export: {} saved, {} failed",
                    report.saved.len(),
                    report.failed.len()
                );
                for (id, reason) in &report.failed {
                    eprintln!("⚠️  Frame {id}: {reason}");
                }
                if let Some(path) = &report.manifest_path {
                    println!("🧾 Manifest: {path}");
                }
                if let Some(reason) = &report.manifest_error {
                    eprintln!("⚠️  Manifest not written: {reason}");
                }
                self.status = report.summary();
                Task::none()
            }

            Message::BatchExportDone(Err(e)) => {
                self.status = format!("⚠️  Export failed: {e}");
                Task::none()
            }
        };

        // Unidirectional redraw contract: the cached canvas geometry is
        // only stale when the store revision or the selection moved.
        if self.store.revision() != self.seen_revision || self.selected != self.seen_selected {
            self.seen_revision = self.store.revision();
            self.seen_selected = self.selected;
            self.canvas_cache.clear();
        }

        task
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let toolbar = row![
            text("Snapbooth").size(28),
            button("📸 Add Snapshot")
                .on_press(Message::AddSnapshot)
                .padding(10),
            button("Export All")
                .on_press(Message::ExportAll)
                .padding(10),
            button("Export Folder...")
                .on_press(Message::ChooseExportDir)
                .padding(10),
        ]
        .spacing(16)
        .align_y(Alignment::Center);

        let booth_canvas = Canvas::new(ui::canvas::BoothCanvas {
            store: &self.store,
            selected: self.selected,
            cache: &self.canvas_cache,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let side_panel: Element<Message> = if let Some(entity) =
            self.selected.and_then(|id| self.store.get(id))
        {
            let mut styles = row![].spacing(8);
            for style in FrameStyle::ALL {
                styles = styles.push(
                    button(text(style.spec().name))
                        .on_press(Message::StyleChosen(style))
                        .padding(6),
                );
            }

            column![
                text(format!("Frame {}", entity.id)).size(20),
                text(format!("{}x{} px source", entity.px_width, entity.px_height)).size(12),
                text_input("Name this snap", &entity.name)
                    .on_input(Message::NameChanged)
                    .padding(8),
                text("Style").size(14),
                styles,
                row![
                    button("Export This")
                        .on_press(Message::ExportSelected)
                        .padding(8),
                    button("Delete")
                        .on_press(Message::DeleteSelected)
                        .padding(8),
                ]
                .spacing(8),
                text("Drag to move. Drag the knob to spin and zoom.").size(12),
            ]
            .spacing(12)
            .width(Length::Fixed(240.0))
            .into()
        } else {
            column![
                text("No frame selected").size(16),
                text("Add a snapshot, then click a frame to name, restyle or export it.")
                    .size(12),
            ]
            .spacing(12)
            .width(Length::Fixed(240.0))
            .into()
        };

        let body = row![
            container(booth_canvas)
                .width(Length::Fill)
                .height(Length::Fill),
            side_panel,
        ]
        .spacing(16);

        column![toolbar, body, text(&self.status).size(14)]
            .spacing(12)
            .padding(16)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application("Snapbooth", Booth::update, Booth::view)
        .theme(Booth::theme)
        .antialiasing(true)
        .window_size(iced::Size::new(1080.0, 720.0))
        .centered()
        .run_with(Booth::new)
}

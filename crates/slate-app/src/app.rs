//! Core application state and lifecycle.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use slate_core::board::{Board, BoardSnapshot};
use slate_core::color::StrokeColor;
use slate_core::config::{BoardConfig, ConfigError};
use slate_core::tools::ToolKind;
use slate_render::{GridStyle, RenderContext, Renderer, RendererError, VelloRenderer};
#[cfg(not(target_arch = "wasm32"))]
use slate_render::{ExportError, PngRenderResult, strip_row_padding};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions, Scene};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

use crate::event_handler::{EventHandler, starts_interaction};
use crate::shortcuts::ShortcutRegistry;
use crate::ui::{UiAction, UiState, render_ui};

#[cfg(feature = "native")]
mod file_ops {
    use slate_render::EXPORT_FILE_NAME;

    /// Save PNG to a file chosen with the native save dialog.
    pub fn export_png(png_data: &[u8]) {
        let dialog = rfd::FileDialog::new()
            .set_title("Save board")
            .set_file_name(EXPORT_FILE_NAME)
            .add_filter("PNG Image", &["png"]);

        if let Some(path) = dialog.save_file() {
            if let Err(e) = std::fs::write(&path, png_data) {
                log::error!("Failed to write PNG: {}", e);
            } else {
                log::info!("Exported PNG to: {:?}", path);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod file_ops {
    use slate_render::EXPORT_FILE_NAME;
    use wasm_bindgen::{JsCast, JsValue};

    /// Export PNG (triggers browser download).
    pub fn export_png(png_data: &[u8]) {
        if let Err(e) = download_binary_file(EXPORT_FILE_NAME, png_data, "image/png") {
            log::error!("Failed to download PNG: {:?}", e);
        }
    }

    fn download_binary_file(filename: &str, data: &[u8], mime_type: &str) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let uint8_array = js_sys::Uint8Array::from(data);
        let blob_parts = js_sys::Array::new();
        blob_parts.push(&uint8_array);

        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&blob_parts, &options)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)?;

        let a = document
            .create_element("a")?
            .dyn_into::<web_sys::HtmlAnchorElement>()?;
        a.set_href(&url);
        a.set_download(filename);
        a.click();

        web_sys::Url::revoke_object_url(&url)
    }
}

/// Offscreen RGBA texture Vello can render into.
fn create_render_texture(device: &vello::wgpu::Device, width: u32, height: u32, label: &str) -> vello::wgpu::Texture {
    device.create_texture(&vello::wgpu::TextureDescriptor {
        label: Some(label),
        size: vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: vello::wgpu::TextureDimension::D2,
        format: vello::wgpu::TextureFormat::Rgba8Unorm,
        usage: vello::wgpu::TextureUsages::STORAGE_BINDING
            | vello::wgpu::TextureUsages::COPY_SRC
            | vello::wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    })
}

/// Create a Vello renderer for `device`.
fn create_vello_renderer(device: &vello::wgpu::Device) -> Result<vello::Renderer, RendererError> {
    vello::Renderer::new(device, RendererOptions::default()).map_err(|e| RendererError::InitFailed(format!("{e:?}")))
}

/// Render `scene` offscreen and queue a copy into a mappable buffer.
/// Returns the buffer and its padded row stride.
fn render_to_readback_buffer(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    vello_renderer: &mut vello::Renderer,
    scene: &Scene,
    width: u32,
    height: u32,
) -> Result<(vello::wgpu::Buffer, u32), RendererError> {
    let texture = create_render_texture(device, width, height, "png export texture");
    let texture_view = texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

    let params = RenderParams {
        base_color: peniko::Color::WHITE,
        width,
        height,
        antialiasing_method: AaConfig::Area,
    };
    vello_renderer
        .render_to_texture(device, queue, scene, &texture_view, &params)
        .map_err(|e| RendererError::RenderFailed(format!("{e:?}")))?;

    let bytes_per_row = (width * 4).next_multiple_of(256); // wgpu alignment requirement
    let readback_buffer = device.create_buffer(&vello::wgpu::BufferDescriptor {
        label: Some("png readback buffer"),
        size: (bytes_per_row * height) as u64,
        usage: vello::wgpu::BufferUsages::COPY_DST | vello::wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
        label: Some("png copy encoder"),
    });
    encoder.copy_texture_to_buffer(
        vello::wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: vello::wgpu::Origin3d::ZERO,
            aspect: vello::wgpu::TextureAspect::All,
        },
        vello::wgpu::TexelCopyBufferInfo {
            buffer: &readback_buffer,
            layout: vello::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    Ok((readback_buffer, bytes_per_row))
}

/// Render a Vello scene to RGBA pixels (native version - blocking).
#[cfg(not(target_arch = "wasm32"))]
fn render_scene_to_png(
    device: &vello::wgpu::Device,
    queue: &vello::wgpu::Queue,
    vello_renderer: &mut vello::Renderer,
    scene: &Scene,
    width: u32,
    height: u32,
) -> Result<PngRenderResult, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptySurface { width, height });
    }

    let (readback_buffer, bytes_per_row) =
        render_to_readback_buffer(device, queue, vello_renderer, scene, width, height)?;

    let buffer_slice = readback_buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    buffer_slice.map_async(vello::wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });

    // Wait for GPU to finish (blocking - native only)
    let _ = device.poll(vello::wgpu::PollType::wait_indefinitely());

    match rx.recv() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(ExportError::Readback(e.to_string())),
        Err(e) => return Err(ExportError::Readback(e.to_string())),
    }

    let data = buffer_slice.get_mapped_range();
    let rgba_data = strip_row_padding(&data, width, height, bytes_per_row);
    drop(data);
    readback_buffer.unmap();

    Ok(PngRenderResult {
        rgba_data: rgba_data?,
        width,
        height,
    })
}

/// Async PNG export for WASM - renders scene and triggers download when complete.
#[cfg(target_arch = "wasm32")]
fn spawn_png_export_async(device: &vello::wgpu::Device, queue: &vello::wgpu::Queue, scene: Scene, width: u32, height: u32) {
    use std::sync::atomic::{AtomicBool, Ordering};
    use wasm_bindgen::prelude::*;

    if width == 0 || height == 0 {
        log::warn!("Cannot export empty surface");
        return;
    }

    log::info!("Starting async PNG export: {}x{}", width, height);

    let mut vello_renderer = match create_vello_renderer(device) {
        Ok(r) => r,
        Err(e) => {
            log::error!("PNG export: {e}");
            return;
        }
    };

    let (readback_buffer, bytes_per_row) =
        match render_to_readback_buffer(device, queue, &mut vello_renderer, &scene, width, height) {
            Ok(result) => result,
            Err(e) => {
                log::error!("PNG export: {e}");
                return;
            }
        };

    let mapped = Arc::new(AtomicBool::new(false));
    let mapped_clone = mapped.clone();
    readback_buffer
        .slice(..)
        .map_async(vello::wgpu::MapMode::Read, move |result| {
            if result.is_ok() {
                mapped_clone.store(true, Ordering::SeqCst);
            } else {
                log::error!("Buffer mapping failed: {:?}", result);
            }
        });

    wasm_bindgen_futures::spawn_local(async move {
        let mut attempts = 0u32;
        const MAX_ATTEMPTS: u32 = 600; // ~10 seconds at 60fps

        while !mapped.load(Ordering::SeqCst) {
            attempts += 1;
            if attempts >= MAX_ATTEMPTS {
                log::error!("Timeout waiting for buffer mapping after {} frames", attempts);
                return;
            }

            // WebGPU callbacks only run once control returns to the browser's task queue
            let promise = js_sys::Promise::new(&mut |resolve, _reject| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let closure = wasm_bindgen::closure::Closure::once_into_js(move || {
                    let _ = resolve.call0(&JsValue::NULL);
                });
                let _ = window.request_animation_frame(closure.unchecked_ref());
            });
            let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
        }

        let data = readback_buffer.slice(..).get_mapped_range();
        let rgba_data = slate_render::strip_row_padding(&data, width, height, bytes_per_row);
        drop(data);
        readback_buffer.unmap();

        let png_data = rgba_data.and_then(|rgba| slate_render::encode_png(&rgba, width, height));
        match png_data {
            Ok(png_data) => {
                file_ops::export_png(&png_data);
                log::info!("PNG export complete: {} bytes", png_data.len());
            }
            Err(e) => log::error!("PNG export failed: {}", e),
        }
    });
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background: StrokeColor,
    pub show_grid: bool,
    pub board: BoardConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Slate".to_string(),
            width: 1280,
            height: 800,
            background: StrokeColor::from_rgb8(240, 240, 240),
            show_grid: true,
            board: BoardConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid {
                field: "width/height",
                reason: format!("window size {}x{} has no area", self.width, self.height),
            });
        }
        self.board.validate()
    }

    fn grid_style(&self) -> GridStyle {
        if self.show_grid { GridStyle::Dots } else { GridStyle::None }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    board_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    board: Board,
    /// Latest snapshot published by the board.
    latest: Rc<RefCell<BoardSnapshot>>,
    config: AppConfig,
    modifiers: ModifiersState,

    event_handler: EventHandler,
}

impl AppState {
    /// Viewport centre in logical pixels.
    fn viewport_center(&self) -> Point {
        let scale_factor = self.window.scale_factor();
        Point::new(
            self.surface.config.width as f64 / scale_factor / 2.0,
            self.surface.config.height as f64 / scale_factor / 2.0,
        )
    }

    fn viewport_size(&self) -> Size {
        Size::new(self.surface.config.width as f64, self.surface.config.height as f64)
    }

    fn render_context<'a>(&self, snapshot: &'a BoardSnapshot) -> RenderContext<'a> {
        let eraser_cursor = (snapshot.tools.tool == ToolKind::Eraser)
            .then(|| self.event_handler.hover_position())
            .flatten()
            .map(|position| (position, self.config.board.erase_radius));

        RenderContext::new(snapshot, self.viewport_size())
            .with_config(&self.config.board)
            .with_scale_factor(self.window.scale_factor())
            .with_background(self.config.background.to_color())
            .with_grid(self.config.grid_style())
            .with_eraser_cursor(eraser_cursor)
    }

    /// Apply a toolbar or keyboard action.
    fn apply_action(&mut self, action: UiAction, render_cx: &vello::util::RenderContext) {
        match action {
            UiAction::SetTool(tool) => self.board.set_tool(tool),
            UiAction::SetColor(color) => {
                if let Err(e) = self.board.set_color(&color) {
                    log::warn!("Ignoring colour {}: {}", color, e);
                }
            }
            UiAction::ClearAll => self.board.clear_all(),
            UiAction::ExportPng => self.export_png(render_cx),
            UiAction::ZoomIn => {
                let center = self.viewport_center();
                self.board.zoom_step(center, true);
            }
            UiAction::ZoomOut => {
                let center = self.viewport_center();
                self.board.zoom_step(center, false);
            }
            UiAction::ResetView => self.board.reset_view(),
        }
        self.window.request_redraw();
    }

    /// Rasterize the board as currently framed and hand the PNG to the platform.
    fn export_png(&mut self, render_cx: &vello::util::RenderContext) {
        let snapshot = self.board.snapshot();
        let ctx = self.render_context(&snapshot);
        let (scene, bounds) = self.board_renderer.build_export_scene(&ctx);
        let Some(bounds) = bounds else {
            log::warn!("Cannot export empty surface");
            return;
        };
        let width = bounds.width() as u32;
        let height = bounds.height() as u32;

        let device_handle = &render_cx.devices[self.surface.dev_id];

        #[cfg(not(target_arch = "wasm32"))]
        {
            let result = render_scene_to_png(
                &device_handle.device,
                &device_handle.queue,
                &mut self.vello_renderer,
                &scene,
                width,
                height,
            )
            .and_then(|pixels| pixels.encode());
            match result {
                #[cfg(feature = "native")]
                Ok(png_data) => file_ops::export_png(&png_data),
                #[cfg(not(feature = "native"))]
                Ok(png_data) => log::info!("Rendered {} byte PNG", png_data.len()),
                Err(e) => log::error!("PNG export failed: {}", e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        spawn_png_export_async(&device_handle.device, &device_handle.queue, scene, width, height);
    }

    /// Draw one frame: board scene, then egui on top. Returns the action the
    /// toolbar triggered this frame, if any.
    fn redraw(&mut self, render_cx: &vello::util::RenderContext) -> Option<UiAction> {
        let snapshot = self.latest.borrow().clone();
        self.ui_state.sync(&snapshot);

        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut action = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            action = render_ui(ctx, &self.ui_state);
        });
        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let render_ctx = self.render_context(&snapshot);
        self.board_renderer.build_scene(&render_ctx);
        let background = self.board_renderer.background_color(&render_ctx);
        let scene = self.board_renderer.take_scene();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match self.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("{}", RendererError::Surface(e.to_string()));
                return action;
            }
        };

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let params = RenderParams {
            base_color: background,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello needs a storage-bindable target, which WebGPU only offers for
        // Rgba8Unorm; the surface itself may be Bgra8Unorm.
        let render_texture = create_render_texture(device, width, height, "vello render texture");
        let render_texture_view = render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = self
            .vello_renderer
            .render_to_texture(device, queue, &scene, &render_texture_view, &params)
            .map_err(|e| RendererError::RenderFailed(format!("{e:?}")))
        {
            log::error!("{e}");
            return action;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
            self.texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("egui encoder"),
            });

            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load, // Keep Vello content
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();

        let repaint_now = egui_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .is_some_and(|viewport| viewport.repaint_delay.is_zero());
        if repaint_now {
            self.window.request_redraw();
        }

        action
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application with default configuration.
    pub async fn run() {
        Self::run_with_config(AppConfig::default()).await;
    }

    /// Run the application.
    pub async fn run_with_config(config: AppConfig) {
        let event_loop = match EventLoop::new() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                log::error!("Failed to create event loop: {}", e);
                return;
            }
        };
        let app = App::with_config(config);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            if let Err(e) = event_loop.run_app(&mut app) {
                log::error!("Event loop error: {}", e);
            }
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let Some(render_cx) = self.render_cx.as_ref() else {
            log::error!("Render context missing after surface creation");
            return;
        };
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = match create_vello_renderer(device) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };

        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface.config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let mut board = Board::new(self.config.board.clone());
        let latest = Rc::new(RefCell::new(board.snapshot()));
        {
            let latest = latest.clone();
            let window = window.clone();
            board.subscribe(move |snapshot| {
                *latest.borrow_mut() = snapshot.clone();
                window.request_redraw();
            });
        }

        log::info!("Slate initialized - {}x{}", surface.config.width, surface.config.height);
        log::info!("Keyboard shortcuts:");
        ShortcutRegistry::log_all();

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            board_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state: UiState::default(),
            board,
            latest,
            config: self.config.clone(),
            modifiers: ModifiersState::empty(),
            event_handler: EventHandler::new(window.scale_factor()),
        });

        self.pending_window = None;
        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // On WASM, attach canvas to DOM and use full viewport
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let Some(web_window) = web_sys::window() else {
                log::error!("No browser window");
                event_loop.exit();
                return;
            };
            let Some(document) = web_window.document() else {
                log::error!("No document");
                event_loop.exit();
                return;
            };

            let viewport_width = web_window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.width as f64);
            let viewport_height = web_window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(self.config.height as f64);

            if let Some(loading) = document.get_element_by_id("loading") {
                loading.remove();
            }

            let canvas = document
                .get_element_by_id("slate-canvas")
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
                .or_else(|| {
                    let body = document.body()?;
                    let canvas = document.create_element("canvas").ok()?;
                    canvas.set_id("slate-canvas");
                    body.append_child(&canvas).ok()?;
                    canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
                });
            let Some(canvas) = canvas else {
                log::error!("Failed to create canvas");
                event_loop.exit();
                return;
            };

            // Backing store in physical pixels for sharp rendering
            let dpr = web_window.device_pixel_ratio();
            let physical_width = (viewport_width * dpr) as u32;
            let physical_height = (viewport_height * dpr) as u32;

            canvas.set_width(physical_width);
            canvas.set_height(physical_height);
            let style = canvas.style();
            let _ = style.set_property("width", "100%");
            let _ = style.set_property("height", "100%");
            let _ = style.set_property("display", "block");
            let _ = style.set_property("position", "fixed");
            let _ = style.set_property("top", "0");
            let _ = style.set_property("left", "0");
            // Let the app see every touch instead of the browser scrolling/zooming
            let _ = style.set_property("touch-action", "none");

            log::info!(
                "Canvas created: {}x{} (physical: {}x{}, dpr: {})",
                viewport_width,
                viewport_height,
                physical_width,
                physical_height,
                dpr
            );

            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        log::info!("Window created, initializing renderer...");

        #[cfg(not(target_arch = "wasm32"))]
        {
            let size = window.inner_size();
            let (width, height) = if size.width == 0 || size.height == 0 {
                (self.config.width, self.config.height)
            } else {
                (size.width, size.height)
            };
            log::info!("Surface size: {}x{}", width, height);

            let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
            let surface: RenderSurface<'static> = match pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            )) {
                Ok(surface) => surface,
                Err(e) => {
                    log::error!("{}", RendererError::Surface(format!("{e:?}")));
                    event_loop.exit();
                    return;
                }
            };
            self.finish_init(window, surface);
        }

        // On WASM, store window for later async initialization
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            self.poll_async_init();
            return;
        }

        let (Some(state), Some(render_cx)) = (self.state.as_mut(), self.render_cx.as_ref()) else {
            return;
        };

        // Let egui process the event first
        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }
        let egui_wants_pointer = egui_response.consumed
            || state.egui_ctx.is_pointer_over_area()
            || state.egui_ctx.wants_pointer_input();

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.event_handler.set_scale_factor(scale_factor);
                state.window.request_redraw();
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers = modifiers.state();
            }

            WindowEvent::RedrawRequested => {
                if let Some(action) = state.redraw(render_cx) {
                    state.apply_action(action, render_cx);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || state.egui_ctx.wants_keyboard_input() {
                    return;
                }
                let ctrl = state.modifiers.control_key() || state.modifiers.super_key();
                if let Some(action) = ShortcutRegistry::lookup_key(&event.logical_key, ctrl) {
                    state.apply_action(action, render_cx);
                }
            }

            other => {
                let Some(input) = state.event_handler.translate(&other) else {
                    return;
                };
                if egui_wants_pointer && starts_interaction(&input) {
                    return;
                }
                state.board.handle_input(&input);
                // Eraser outline follows the pointer
                if state.board.tool() == ToolKind::Eraser {
                    state.window.request_redraw();
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl App {
    /// Start async surface creation for the pending window once.
    fn poll_async_init(&mut self) {
        let Some(window) = self.pending_window.clone() else {
            return;
        };
        if !self.init_in_progress.get() {
            self.init_in_progress.set(true);

            let size = window.inner_size();
            let (width, height) = if size.width == 0 || size.height == 0 {
                (self.config.width, self.config.height)
            } else {
                (size.width, size.height)
            };

            let self_ptr = self as *mut Self;
            let window_clone = window.clone();

            wasm_bindgen_futures::spawn_local(async move {
                log::info!("Creating surface asynchronously...");
                let mut render_cx = vello::util::RenderContext::new();

                let result = render_cx
                    .create_surface(window_clone.clone(), width, height, PresentMode::AutoVsync)
                    .await;

                // SAFETY: WASM is single-threaded and the event loop keeps the App alive.
                let app = unsafe { &mut *self_ptr };
                match result {
                    Ok(surface) => {
                        log::info!("Surface created successfully");
                        app.render_cx = Some(render_cx);
                        app.finish_init(window_clone, surface);
                    }
                    Err(e) => {
                        log::error!("{}", RendererError::Surface(format!("{e:?}")));
                        app.init_in_progress.set(false);
                    }
                }
            });
        }

        // Keep the event loop running until the surface exists
        window.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.background.as_str(), "#f0f0f0");
        assert_eq!(config.grid_style(), GridStyle::Dots);
    }

    #[test]
    fn test_config_partial_json() {
        let config = AppConfig::from_json_str(
            r##"{ "title": "Team board", "show_grid": false, "board": { "stroke_width": 3.0 } }"##,
        )
        .unwrap();
        assert_eq!(config.title, "Team board");
        assert_eq!(config.grid_style(), GridStyle::None);
        assert_eq!(config.board.stroke_width, 3.0);
        assert_eq!(config.board.zoom_step, BoardConfig::default().zoom_step);
        assert_eq!(config.width, 1280);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_json_str(r#"{ "width": 0 }"#),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            AppConfig::from_json_str(r#"{ "background": "grey" }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(AppConfig::from_json_str(r#"{ "board": { "zoom_step": -1.0 } }"#).is_err());
    }

    #[test]
    fn test_config_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r##"{{ "background": "#ffffff" }}"##).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.background.as_str(), "#ffffff");
    }

    #[test]
    fn test_config_load_missing_file() {
        assert!(matches!(
            AppConfig::load("/nonexistent/slate.json"),
            Err(ConfigError::Io(_))
        ));
    }
}

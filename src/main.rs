//! Falling Shapes entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, PointerEvent, TouchEvent};

    use falling_shapes::renderer::RenderState;
    use falling_shapes::sim::{Director, RemovalCause, ShapeEvent};
    use falling_shapes::{Canvas, SimulationConfig};

    /// App instance holding all state
    struct App {
        director: Director,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
    }

    impl App {
        /// CSS size of the canvas (simulation space) and its backing size in device pixels
        fn measure(&self) -> ((f32, f32), (u32, u32)) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let client_w = self.canvas.client_width().max(1);
            let client_h = self.canvas.client_height().max(1);
            (
                (client_w as f32, client_h as f32),
                ((client_w as f64 * dpr) as u32, (client_h as f64 * dpr) as u32),
            )
        }

        fn resize(&mut self) {
            let ((w, h), (pw, ph)) = self.measure();
            self.canvas.set_width(pw);
            self.canvas.set_height(ph);
            self.director.resize(w, h);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(pw, ph, (w, h));
            }
            log::info!("Canvas resized to {}x{}", w, h);
        }

        /// Canvas-relative position of a client-space point
        fn client_to_canvas(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                client_x as f32 - rect.left() as f32,
                client_y as f32 - rect.top() as f32,
            )
        }

        fn update(&mut self, time: f64) {
            self.director.pump(time);
            for event in self.director.drain_events() {
                match event {
                    ShapeEvent::Spawned(id) => log::trace!("spawned #{}", id.0),
                    ShapeEvent::Removed { id, cause: RemovalCause::Pointer } => {
                        log::trace!("#{} removed by pointer", id.0)
                    }
                    ShapeEvent::Removed { id, cause: RemovalCause::ExitedCanvas } => {
                        log::trace!("#{} left the canvas", id.0)
                    }
                }
            }
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.director.population()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        let canvas_size = render_state.canvas_size;
                        render_state.resize(w, h, canvas_size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update stat readouts in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let stats = self.director.stats();
            set_text(&document, "shapeCount", &stats.count.to_string());
            set_text(&document, "shapeArea", &stats.area_label());
        }

        fn update_controls(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let config = self.director.config();
            set_text(&document, "shapeRate", &config.spawn_rate().to_string());
            set_text(&document, "gravityValue", &config.gravity_label());
        }
    }

    fn set_text(document: &web_sys::Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Falling Shapes starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let director = Director::new(SimulationConfig::default(), Canvas::new(1.0, 1.0), seed);
        let app = Rc::new(RefCell::new(App {
            director,
            render_state: None,
            canvas: canvas.clone(),
        }));
        app.borrow_mut().resize();

        log::info!("Director initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let ((w, h), (pw, ph)) = app.borrow().measure();
        let render_state = RenderState::new(surface, &adapter, pw, ph, (w, h))
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, app.clone());
        setup_controls(app.clone());
        setup_resize(app.clone());

        {
            // rAF and event timestamps share the performance clock origin.
            // Start from its current reading so GPU setup time is not replayed as spawns.
            let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
            let mut a = app.borrow_mut();
            a.director.start(now);
            a.update_controls();
        }

        request_animation_frame(app);

        log::info!("Falling Shapes running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Pointer down - shapes under the pointer are removed
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let point = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                let now = event.time_stamp();
                let mut a = app.borrow_mut();
                a.director.pointer_down(point, now);
                a.update_hud();
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - spawn at the cursor unless a removal just happened
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                let now = event.time_stamp();
                let mut a = app.borrow_mut();
                a.director.canvas_click(point, now);
                a.update_hud();
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - single-finger taps spawn
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                // Suppress the synthetic click that would spawn a second shape
                event.prevent_default();
                let now = event.time_stamp();
                let mut a = app.borrow_mut();
                let list = event.touches();
                let touches: Vec<Vec2> = (0..list.length())
                    .filter_map(|i| list.get(i))
                    .map(|t| a.client_to_canvas(t.client_x(), t.client_y()))
                    .collect();
                a.director.canvas_touch(&touches, now);
                a.update_hud();
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
    }

    /// Rate and gravity buttons
    fn setup_controls(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let buttons: [(&str, fn(&mut App, f64)); 4] = [
            ("decreaseRate", |a, now| {
                a.director.change_spawn_rate(-1, now);
            }),
            ("increaseRate", |a, now| {
                a.director.change_spawn_rate(1, now);
            }),
            ("decreaseGravity", |a, _| {
                a.director.change_gravity(-1);
            }),
            ("increaseGravity", |a, _| {
                a.director.change_gravity(1);
            }),
        ];

        for (id, action) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing control #{}", id);
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                action(&mut *a, event.time_stamp());
                a.update_controls();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Falling Shapes (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    run_headless(10.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the director at 60 fps for `seconds` and print the stats readout
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(seconds: f64) {
    use falling_shapes::sim::Director;
    use falling_shapes::{Canvas, SimulationConfig};
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut director = Director::new(SimulationConfig::default(), Canvas::new(800.0, 600.0), 42);
    director.start(0.0);
    director.change_spawn_rate(2, 0.0);

    let frames = (seconds * 1000.0 / FRAME_MS) as u64;
    for frame in 1..=frames {
        let now = frame as f64 * FRAME_MS;
        director.pump(now);

        // Every 3 seconds, press the middle of the canvas and tap right after
        if frame % 180 == 0 {
            let center = Vec2::new(400.0, 300.0);
            if let Some(id) = director.pointer_down(center, now) {
                log::info!("Pressed shape #{}", id.0);
            }
            director.canvas_click(center, now + 50.0);
        }

        if frame % 60 == 0 {
            let stats = director.stats();
            println!(
                "t={:>5.1}s  shapes={:>3}  area={:>10}",
                now / 1000.0,
                stats.count,
                stats.area_label()
            );
        }
        director.drain_events();
    }
}

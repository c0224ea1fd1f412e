//! Marble Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{DeviceOrientationEvent, Document, KeyboardEvent, MouseEvent, TouchEvent, WheelEvent};

    use marble_run::audio::{AudioManager, SoundEffect};
    use marble_run::camera::OrbitCamera;
    use marble_run::consts::DEFAULT_DT;
    use marble_run::effects::Effects;
    use marble_run::frame::{FrameView, SceneView};
    use marble_run::hud::{FpsCounter, HudView};
    use marble_run::input::InputState;
    use marble_run::persistence;
    use marble_run::platform;
    use marble_run::settings::Settings;
    use marble_run::sim::{GameEvent, GameState, tick};

    /// Seconds between periodic auto-saves
    const AUTO_SAVE_INTERVAL: f64 = 10.0;

    // The page provides `window.marbleRenderer` (three.js scene); we only hand it data.
    #[wasm_bindgen(inline_js = "
        export function init_scene(json) {
            const r = window.marbleRenderer;
            if (r && r.initScene) {
                r.initScene(JSON.parse(json));
            } else {
                console.warn('marbleRenderer.initScene missing');
            }
        }

        export function render_frame(json) {
            const r = window.marbleRenderer;
            if (r && r.renderFrame) {
                r.renderFrame(JSON.parse(json));
            }
        }

        export function listen_device_orientation(handler) {
            const DOE = window.DeviceOrientationEvent;
            if (DOE && typeof DOE.requestPermission === 'function') {
                // iOS 13+ gates orientation events behind a permission prompt
                DOE.requestPermission()
                    .then((response) => {
                        if (response === 'granted') {
                            window.addEventListener('deviceorientation', handler, false);
                        }
                    })
                    .catch(console.error);
            } else {
                window.addEventListener('deviceorientation', handler, false);
            }
        }
    ")]
    extern "C" {
        fn init_scene(json: &str);
        fn render_frame(json: &str);
        fn listen_device_orientation(handler: &js_sys::Function);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        camera: OrbitCamera,
        input: InputState,
        effects: Effects,
        settings: Settings,
        audio: AudioManager,
        fps: FpsCounter,
        last_time: f64,
        last_save: f64,
        // Right-button orbit drag
        dragging: bool,
        last_mouse: (i32, i32),
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);

            let mut state = GameState::default_course();
            match state.load() {
                Ok(true) => log::info!("Continuing saved progress"),
                Ok(false) => {}
                Err(e) => {
                    log::warn!("Discarding save: {e}");
                    let _ = persistence::clear_save();
                }
            }

            let mut camera = OrbitCamera::default();
            camera.snap(state.body.position);

            Self {
                effects: Effects::new(seed, &settings),
                state,
                camera,
                input: InputState::new(),
                settings,
                audio,
                fps: FpsCounter::new(),
                last_time: 0.0,
                last_save: 0.0,
                dragging: false,
                last_mouse: (0, 0),
            }
        }

        /// One simulation tick plus presentation bookkeeping
        fn update(&mut self, dt: f32, time: f64) {
            let input = self.input.take_tick_input(self.camera.yaw);
            tick(&mut self.state, &input, dt);

            let mut save_now = false;
            for event in self.state.drain_events() {
                self.effects.handle_event(&event, self.state.body.radius());
                if let Some(sound) = SoundEffect::for_event(&event) {
                    self.audio.play(sound);
                }
                match event {
                    GameEvent::GemCollected { .. }
                    | GameEvent::SessionStarted
                    | GameEvent::LevelCompleted(_) => save_now = true,
                    GameEvent::LevelReset => {
                        self.camera.snap(self.state.body.position);
                        save_now = true;
                    }
                    GameEvent::Jumped { .. } => {}
                }
            }

            self.effects.update(dt, &self.state);
            self.camera.follow(self.state.body.position);
            self.fps.record(time);

            if save_now || self.state.clock - self.last_save > AUTO_SAVE_INTERVAL {
                self.save();
            }
        }

        fn save(&mut self) {
            if let Err(e) = self.state.save() {
                log::warn!("Auto-save failed: {e}");
            }
            self.last_save = self.state.clock;
        }

        fn render(&self) {
            match FrameView::new(&self.state, &self.camera, &self.effects).to_json() {
                Ok(json) => render_frame(&json),
                Err(e) => log::error!("Frame encode failed: {e}"),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let fps = self.settings.show_fps.then(|| self.fps.fps());
            let view = HudView::from_state(&self.state, fps);

            set_text(document, "hud-speed", &view.speed);
            set_text(document, "hud-gems", &view.gems);
            set_text(document, "hud-time", &view.time);
            set_text(document, "hud-fps", view.fps.as_deref().unwrap_or(""));

            if let Some(el) = document.get_element_by_id("hud-boost-fill") {
                let color = if view.boosting { "#ffb84c" } else { "#4ca1ff" };
                let _ = el.set_attribute(
                    "style",
                    &format!(
                        "height:100%;width:{}%;background:{color};",
                        view.boost_percent
                    ),
                );
            }

            if let Some(el) = document.get_element_by_id("hud-banner") {
                match &view.banner {
                    Some(text) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    /// Build the overlay if the page did not ship one
    fn ensure_hud(document: &Document) {
        if document.get_element_by_id("hud").is_some() {
            return;
        }
        let Some(body) = document.body() else { return };
        let Ok(hud) = document.create_element("div") else {
            return;
        };
        hud.set_id("hud");
        let _ = hud.set_attribute(
            "style",
            "position:fixed;top:10px;left:10px;color:#fff;font-family:monospace;\
             background:rgba(0,0,0,0.5);padding:10px;border-radius:5px;",
        );
        for id in ["hud-speed", "hud-gems", "hud-time", "hud-fps"] {
            if let Ok(line) = document.create_element("div") {
                line.set_id(id);
                let _ = hud.append_child(&line);
            }
        }
        if let (Ok(bar), Ok(fill)) = (document.create_element("div"), document.create_element("div")) {
            let _ = bar.set_attribute(
                "style",
                "width:120px;height:8px;margin-top:6px;background:rgba(255,255,255,0.2);",
            );
            fill.set_id("hud-boost-fill");
            let _ = bar.append_child(&fill);
            let _ = hud.append_child(&bar);
        }
        if let Ok(banner) = document.create_element("div") {
            banner.set_id("hud-banner");
            let _ = banner.set_attribute("class", "hidden");
            let _ = hud.append_child(&banner);
        }
        let _ = body.append_child(&hud);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Marble Run starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - cannot start");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        {
            let g = game.borrow();
            match serde_json::to_string(&SceneView::new(&g.state.level, g.state.body.radius())) {
                Ok(json) => init_scene(&json),
                Err(e) => log::error!("Scene encode failed: {e}"),
            }
        }

        ensure_hud(&document);
        setup_keyboard(game.clone());
        setup_mouse(game.clone());
        setup_focus(game.clone(), &document);
        if platform::is_mobile() {
            setup_mobile_controls(game.clone(), &document);
        }

        request_animation_frame(game);

        log::info!("Marble Run running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        for (kind, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                let mut g = game.borrow_mut();
                if g.input.handle_key(&code, pressed) {
                    // Keep Space and arrows from scrolling the page
                    event.prevent_default();
                }
                if pressed {
                    g.audio.resume();
                }
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mouse(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Right button drag orbits the camera
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 2 {
                    let mut g = game.borrow_mut();
                    g.dragging = true;
                    g.last_mouse = (event.client_x(), event.client_y());
                }
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 2 {
                    game.borrow_mut().dragging = false;
                }
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if !g.dragging {
                    return;
                }
                let (x, y) = (event.client_x(), event.client_y());
                let dx = (x - g.last_mouse.0) as f32;
                let dy = (y - g.last_mouse.1) as f32;
                g.last_mouse = (x, y);
                let (sensitivity, invert) = (g.settings.camera_sensitivity, g.settings.invert_y);
                g.camera.orbit(dx, dy, sensitivity, invert);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
            });
            let _ = window
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                game.borrow_mut().camera.zoom(event.delta_y() as f32);
            });
            let _ = window.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus(game: Rc<RefCell<Game>>, document: &Document) {
        let Some(window) = web_sys::window() else { return };

        // Window blur: drop held keys so the marble does not run away
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.input.release_all();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tab hidden: save progress
        {
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.release_all();
                    g.save();
                    log::info!("Saved on tab hide");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_mobile_controls(game: Rc<RefCell<Game>>, document: &Document) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
                let (Some(gamma), Some(beta)) = (event.gamma(), event.beta()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                let range = g.settings.tilt_range_degrees;
                g.input.set_tilt(gamma, beta, range);
            });
            listen_device_orientation(closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(body) = document.body() else { return };
        let buttons: [(&str, &str, fn(&mut InputState, bool)); 2] = [
            ("Jump", "bottom:80px;right:20px;", InputState::set_jump_button),
            ("Boost", "bottom:80px;left:20px;", InputState::set_boost_button),
        ];
        for (label, position, apply) in buttons {
            let Ok(button) = document.create_element("button") else {
                continue;
            };
            button.set_text_content(Some(label));
            let _ = button.set_attribute(
                "style",
                &format!(
                    "position:fixed;{position}padding:20px;font-size:18px;border-radius:50%;"
                ),
            );

            for (kind, pressed) in [("touchstart", true), ("touchend", false)] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    apply(&mut g.input, pressed);
                    if pressed {
                        g.audio.resume();
                    }
                });
                let _ = button
                    .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
                closure.forget();
            }
            let _ = body.append_child(&button);
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                DEFAULT_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Marble Run (native) starting...");
    log::info!("Rendering needs the browser build - running a headless course run instead");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => marble_run::PhysicsTuning::default(),
    };

    headless_run(tuning);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<marble_run::PhysicsTuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(marble_run::PhysicsTuning::from_json(&json)?)
}

/// Drop onto the start pad and roll toward the finish for ten simulated seconds
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(tuning: marble_run::PhysicsTuning) {
    use glam::Vec2;
    use marble_run::consts::DEFAULT_DT;
    use marble_run::hud::HudView;
    use marble_run::sim::{GameEvent, GameState, InputIntent, Level, TickInput, tick};

    let mut state = GameState::new(tuning, Level::default_course());
    // Camera turned so "forward" runs down the course (+x)
    let input = TickInput {
        intent: InputIntent {
            direction: Vec2::new(0.0, -1.0),
            ..Default::default()
        },
        camera_yaw: -std::f32::consts::FRAC_PI_2,
        reset: false,
    };

    for i in 0..600 {
        let input = if i < 60 { TickInput::default() } else { input };
        tick(&mut state, &input, DEFAULT_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::GemCollected { remaining, .. } => {
                    println!("gem collected, {remaining} left");
                }
                GameEvent::SessionStarted => println!("run started"),
                GameEvent::LevelCompleted(report) => println!("{report:?}"),
                GameEvent::Jumped { .. } | GameEvent::LevelReset => {}
            }
        }

        if i % 60 == 0 {
            let hud = HudView::from_state(&state, None);
            println!(
                "{} | {} | {} | pos {:.1?}",
                hud.speed, hud.gems, hud.time, state.body.position
            );
        }
    }

    println!("✓ Headless run finished ({} ticks)", state.time_ticks);
}

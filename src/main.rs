use std::cell::Cell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::Parser;
use gilrs::{EventType, Gilrs};
use log::{info, warn};
use pixels::{Pixels, SurfaceTexture};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use ardu_sim::board::{Board, HaltReason, LoopState};
use ardu_sim::clock::TimeSync;
use ardu_sim::config::SimConfig;
use ardu_sim::display::DisplayController;
use ardu_sim::input::{BUTTON_COUNT, Button, InputRouter};
use ardu_sim::keymap::{Keymap, pad_button};
use ardu_sim::mcu::{CoreState, IrqLine, Mcu};

const OLED_COLUMNS: usize = 128;
const OLED_PAGES: usize = 8;

#[derive(Parser)]
struct Args {
    /// On-screen pixel scale (overrides the config file)
    #[arg(long)]
    scale: Option<u32>,

    /// Path to a simulation config TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a keymap TOML file
    #[arg(long)]
    keymap: Option<PathBuf>,

    /// Run without opening a window
    #[arg(long)]
    headless: bool,

    /// Number of frames to run in headless mode
    #[arg(long)]
    frames: Option<u64>,

    /// Number of seconds to run in headless mode
    #[arg(long)]
    seconds: Option<u64>,
}

/// RAM-backed display controller state for the demo core. The real peripheral
/// command decoder lives in the emulated core; the demo writes this state
/// directly.
struct DemoDisplay {
    vram: Vec<u8>,
    contrast: u8,
    on: bool,
    inverted: bool,
    hflip: bool,
    vflip: bool,
}

impl DemoDisplay {
    fn new() -> Self {
        Self {
            vram: vec![0; OLED_COLUMNS * OLED_PAGES],
            contrast: 0x7F,
            on: true,
            inverted: false,
            hflip: false,
            vflip: false,
        }
    }

    fn clear(&mut self) {
        self.vram.fill(0);
    }

    fn set_pixel(&mut self, x: usize, y: usize) {
        if x < OLED_COLUMNS && y < OLED_PAGES * 8 {
            self.vram[(y / 8) * OLED_COLUMNS + x] |= 1 << (y % 8);
        }
    }
}

impl DisplayController for DemoDisplay {
    fn pages(&self) -> usize {
        OLED_PAGES
    }

    fn columns(&self) -> usize {
        OLED_COLUMNS
    }

    fn vram(&self, page: usize, column: usize) -> u8 {
        self.vram[page * OLED_COLUMNS + column]
    }

    fn contrast(&self) -> u8 {
        self.contrast
    }

    fn display_on(&self) -> bool {
        self.on
    }

    fn inverted(&self) -> bool {
        self.inverted
    }

    fn segment_remap(&self) -> bool {
        self.hflip
    }

    fn com_scan_reversed(&self) -> bool {
        self.vflip
    }
}

struct DemoLine(Rc<Cell<bool>>);

impl IrqLine for DemoLine {
    fn drive(&mut self, level: bool) {
        self.0.set(level);
    }
}

/// Scripted stand-in for the instruction-set core: a ball steered by the
/// button lines, redrawn into the display state as the cycle counter
/// advances. It executes no instructions, so every burst is idle time and the
/// whole run is paced by [`TimeSync`].
struct DemoCore {
    cycle: u64,
    frequency_hz: u64,
    last_anim: u64,
    ball_x: f32,
    ball_y: f32,
    display: DemoDisplay,
    lines: [Rc<Cell<bool>>; BUTTON_COUNT],
}

impl DemoCore {
    fn new(frequency_hz: u64) -> (Self, [DemoLine; BUTTON_COUNT]) {
        let lines: [Rc<Cell<bool>>; BUTTON_COUNT] =
            std::array::from_fn(|_| Rc::new(Cell::new(true)));
        let handles = lines.clone().map(DemoLine);
        let core = Self {
            cycle: 0,
            frequency_hz,
            last_anim: 0,
            ball_x: (OLED_COLUMNS / 2) as f32,
            ball_y: (OLED_PAGES * 4) as f32,
            display: DemoDisplay::new(),
            lines,
        };
        (core, handles)
    }

    // Lines are active-low: a held button reads as a low level.
    fn held(&self, button: Button) -> bool {
        !self.lines[button.index()].get()
    }

    fn animate(&mut self) {
        let dt_cycles = self.cycle - self.last_anim;
        if dt_cycles == 0 {
            return;
        }
        self.last_anim = self.cycle;
        let dt = dt_cycles as f32 / self.frequency_hz as f32;

        let speed = if self.held(Button::A) { 96.0 } else { 48.0 };
        if self.held(Button::Up) {
            self.ball_y -= speed * dt;
        }
        if self.held(Button::Down) {
            self.ball_y += speed * dt;
        }
        if self.held(Button::Left) {
            self.ball_x -= speed * dt;
        }
        if self.held(Button::Right) {
            self.ball_x += speed * dt;
        }
        self.ball_x = self.ball_x.clamp(2.0, (OLED_COLUMNS - 6) as f32);
        self.ball_y = self.ball_y.clamp(2.0, (OLED_PAGES * 8 - 6) as f32);
        self.display.inverted = self.held(Button::B);

        self.display.clear();
        for x in 0..OLED_COLUMNS {
            self.display.set_pixel(x, 0);
            self.display.set_pixel(x, OLED_PAGES * 8 - 1);
        }
        for y in 0..OLED_PAGES * 8 {
            self.display.set_pixel(0, y);
            self.display.set_pixel(OLED_COLUMNS - 1, y);
        }
        let (bx, by) = (self.ball_x as usize, self.ball_y as usize);
        for dy in 0..4 {
            for dx in 0..4 {
                self.display.set_pixel(bx + dx, by + dy);
            }
        }
    }
}

impl Mcu for DemoCore {
    type Display = DemoDisplay;

    fn cycle(&self) -> u64 {
        self.cycle
    }

    fn run_until(&mut self, target: u64, pacer: &TimeSync) -> CoreState {
        // Idle through the burst in ~1 ms slices so pacing stays smooth.
        let step = (self.frequency_hz / 1_000).max(1);
        while self.cycle < target {
            self.cycle += step.min(target - self.cycle);
            pacer.sync(self.cycle);
        }
        self.animate();
        CoreState::Running
    }

    fn display(&self) -> &DemoDisplay {
        &self.display
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => match SimConfig::load_from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Invalid config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };
    if let Some(scale) = args.scale {
        cfg.pixel_scale = scale;
    }

    let keymap = match &args.keymap {
        Some(path) => match Keymap::load_from_file(path) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("Invalid keymap: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Keymap::defaults(),
    };

    let (mut core, line_handles) = DemoCore::new(cfg.frequency_hz);
    let mut board = match Board::new(&cfg, core.display()) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Invalid config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut router = InputRouter::new(line_handles);

    info!(
        "simulation ready: {}x{} display at {}x scale, {} Hz",
        OLED_COLUMNS,
        OLED_PAGES * 8,
        cfg.pixel_scale,
        cfg.frequency_hz
    );

    if args.headless {
        let frame_limit = args.frames;
        let second_limit = args.seconds.map(Duration::from_secs);
        let start = Instant::now();
        let mut frame_count = 0u64;

        loop {
            let state = board.run_burst(&mut core, &mut |_frame| {
                frame_count += 1;
            });
            match state {
                LoopState::Halted(HaltReason::Crashed) => {
                    eprintln!("Core crashed");
                    return ExitCode::FAILURE;
                }
                LoopState::Halted(HaltReason::Done) => break,
                _ => {}
            }
            if let Some(max) = frame_limit {
                if frame_count >= max {
                    break;
                }
            }
            if let Some(limit) = second_limit {
                if start.elapsed() >= limit {
                    break;
                }
            }
        }
        info!("headless run finished after {frame_count} frames");
        return ExitCode::SUCCESS;
    }

    let width = board.frame_width() as u32;
    let height = board.frame_height() as u32;

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("ardu-sim")
        .with_inner_size(LogicalSize::new(width as f64, height as f64))
        .build(&event_loop)
        .expect("Failed to create window");

    let size = window.inner_size();
    let surface = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(width, height, surface).expect("Pixels error");

    let mut gilrs = match Gilrs::new() {
        Ok(g) => Some(g),
        Err(e) => {
            warn!("gamepad support unavailable: {e}");
            None
        }
    };

    let mut presented = vec![0u32; (width * height) as usize];

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(size) => {
                    let _ = pixels.resize_surface(size.width, size.height);
                }
                WindowEvent::KeyboardInput { input, .. } => {
                    if let Some(key) = input.virtual_keycode {
                        let pressed = input.state == ElementState::Pressed;
                        if keymap.is_quit(key) {
                            // Quit bypasses the interrupt router entirely.
                            if pressed {
                                *control_flow = ControlFlow::Exit;
                            }
                        } else if let Some(button) = keymap.button_for(key) {
                            // Auto-repeat arrives as duplicate pressed events;
                            // the router's edge filter drops them.
                            router.report_button_edge(button, pressed);
                        }
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                if let Some(g) = gilrs.as_mut() {
                    while let Some(pad_event) = g.next_event() {
                        match pad_event.event {
                            EventType::ButtonPressed(b, _) => {
                                if let Some(button) = pad_button(b) {
                                    router.report_button_edge(button, true);
                                }
                            }
                            EventType::ButtonReleased(b, _) => {
                                if let Some(button) = pad_button(b) {
                                    router.report_button_edge(button, false);
                                }
                            }
                            _ => {}
                        }
                    }
                }

                let state = board.run_burst(&mut core, &mut |frame| {
                    presented.copy_from_slice(frame);
                });
                match state {
                    LoopState::Yielded => window.request_redraw(),
                    LoopState::Halted(HaltReason::Done) => {
                        info!("core finished");
                        *control_flow = ControlFlow::Exit;
                    }
                    LoopState::Halted(HaltReason::Crashed) => {
                        eprintln!("Core crashed");
                        *control_flow = ControlFlow::Exit;
                    }
                    LoopState::Running => {}
                }
            }
            Event::RedrawRequested(_) => {
                let dst: &mut [u32] = bytemuck::cast_slice_mut(pixels.frame_mut());
                for (dst, src) in dst.iter_mut().zip(&presented) {
                    let r = ((src >> 16) & 0xFF) as u8;
                    let g = ((src >> 8) & 0xFF) as u8;
                    let b = (src & 0xFF) as u8;
                    *dst = u32::from_ne_bytes([r, g, b, 0xFF]);
                }
                if pixels.render().is_err() {
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });
}

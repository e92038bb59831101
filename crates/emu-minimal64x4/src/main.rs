//! Minimal 64x4 emulator binary.
//!
//! Runs the machine in a winit window with a pixels framebuffer, or in
//! headless mode for scripted runs and screenshots.
//!
//! Window keys: F1 resets the CPU, F4 sends the upload file over the serial
//! line, Ctrl+Escape quits. Everything else goes to the PS/2 keyboard.

#![allow(clippy::cast_possible_truncation)]

use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use emu_minimal64x4::{
    Minimal64x4, Minimal64x4Config, Scheduler, capture, config, keyboard_map, video,
};
use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "emu-minimal64x4", about = "Minimal 64x4 breadboard computer emulator")]
struct Args {
    /// Directory holding ctrl_lsb.bin, ctrl_msb.bin and ctrl_hsb.bin.
    #[arg(long, value_name = "DIR", default_value = ".")]
    rom_dir: PathBuf,

    /// Flash image to load (defaults to flash.bin in the ROM directory).
    #[arg(long, value_name = "PATH")]
    flash: Option<PathBuf>,

    /// File sent over the serial line on F4 (or at start-up when headless).
    #[arg(long, value_name = "PATH", default_value = "uart.txt")]
    upload: PathBuf,

    /// Run without a window.
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Cycles to run in headless mode.
    #[arg(long, default_value_t = 80_000_000)]
    cycles: u64,

    /// Save a PNG of the display after a headless run.
    #[arg(long, value_name = "PATH")]
    screenshot: Option<PathBuf>,

    /// Window scale factor.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=8))]
    scale: u32,
}

fn make_machine(args: &Args) -> Minimal64x4 {
    let flash = args
        .flash
        .clone()
        .unwrap_or_else(|| args.rom_dir.join(config::FLASH_FILE));
    let machine = Minimal64x4Config::load(&args.rom_dir, &flash).and_then(Minimal64x4::new);
    match machine {
        Ok(m) => {
            log::info!(
                "loaded control ROM from {} and flash from {}",
                args.rom_dir.display(),
                flash.display()
            );
            m
        }
        Err(e) => {
            eprintln!("Failed to start: {e}");
            process::exit(1);
        }
    }
}

fn upload(machine: &mut Minimal64x4, path: &std::path::Path) {
    match config::read_file(path) {
        Ok(bytes) => {
            machine.upload_serial(&bytes);
        }
        Err(e) => log::error!("{e}"),
    }
}

fn flush_serial(machine: &mut Minimal64x4) {
    let out = machine.take_serial_output();
    if out.is_empty() {
        return;
    }
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(&out).and_then(|()| stdout.flush()) {
        log::warn!("serial output: {e}");
    }
}

// ---------------------------------------------------------------------------
// Headless mode
// ---------------------------------------------------------------------------

fn run_headless(args: &Args) {
    let mut machine = make_machine(args);
    if args.upload.exists() {
        upload(&mut machine, &args.upload);
    }

    let start = Instant::now();
    machine.run_cycles(args.cycles);
    flush_serial(&mut machine);
    log::info!("ran {} cycles in {:?}", machine.cycles(), start.elapsed());

    if let Some(ref path) = args.screenshot {
        if let Err(e) = capture::save_screenshot(&machine, path) {
            eprintln!("Screenshot error: {e}");
            process::exit(1);
        }
        eprintln!("Screenshot saved to {}", path.display());
    }
}

// ---------------------------------------------------------------------------
// Windowed mode (winit + pixels)
// ---------------------------------------------------------------------------

struct App {
    machine: Minimal64x4,
    scheduler: Scheduler,
    upload_path: PathBuf,
    scale: u32,
    window: Option<&'static Window>,
    pixels: Option<Pixels<'static>>,
    modifiers: ModifiersState,
    framebuffer: Vec<u32>,
}

impl App {
    fn new(machine: Minimal64x4, upload_path: PathBuf, scale: u32) -> Self {
        Self {
            machine,
            scheduler: Scheduler::new(Instant::now()),
            upload_path,
            scale,
            window: None,
            pixels: None,
            modifiers: ModifiersState::empty(),
            framebuffer: vec![0; (video::WIDTH * video::HEIGHT) as usize],
        }
    }

    fn handle_key(&mut self, keycode: KeyCode, pressed: bool) {
        match keycode {
            KeyCode::F1 if pressed => self.machine.reset(),
            KeyCode::F4 if pressed => {
                let path = self.upload_path.clone();
                upload(&mut self.machine, &path);
            }
            _ => {
                if let Some(key) = keyboard_map::map_keycode(keycode) {
                    self.machine.key_event(key, pressed);
                }
            }
        }
    }

    fn update_pixels(&mut self) {
        let Some(pixels) = self.pixels.as_mut() else {
            return;
        };

        self.machine.render_framebuffer(&mut self.framebuffer);
        let frame = pixels.frame_mut();

        // Convert ARGB32 → RGBA8 for pixels buffer
        for (dst, &argb) in frame.chunks_exact_mut(4).zip(&self.framebuffer) {
            let [_, r, g, b] = argb.to_be_bytes();
            dst.copy_from_slice(&[r, g, b, 0xFF]);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already created
        }

        let window_size =
            winit::dpi::LogicalSize::new(video::WIDTH * self.scale, video::HEIGHT * self.scale);
        let attrs = WindowAttributes::default()
            .with_title("Minimal 64x4")
            .with_inner_size(window_size)
            .with_resizable(false);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                // The window lives until the process exits.
                let window: &'static Window = Box::leak(Box::new(window));
                let inner = window.inner_size();
                let surface = SurfaceTexture::new(inner.width, inner.height, window);
                match Pixels::new(video::WIDTH, video::HEIGHT, surface) {
                    Ok(pixels) => {
                        self.pixels = Some(pixels);
                    }
                    Err(e) => {
                        eprintln!("Failed to create pixels: {e}");
                        event_loop.exit();
                        return;
                    }
                }
                self.window = Some(window);
                self.scheduler = Scheduler::new(Instant::now());
            }
            Err(e) => {
                eprintln!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    if keycode == KeyCode::Escape && pressed && self.modifiers.control_key() {
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(keycode, pressed);
                }
            }
            WindowEvent::RedrawRequested => {
                let cycles = self.scheduler.advance(Instant::now());
                self.machine.run_cycles(cycles.get());
                flush_serial(&mut self.machine);
                self.update_pixels();

                if let Some(pixels) = self.pixels.as_ref() {
                    if let Err(e) = pixels.render() {
                        eprintln!("Render error: {e}");
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window {
            window.request_redraw();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.headless {
        run_headless(&args);
        return;
    }

    let machine = make_machine(&args);
    let mut app = App::new(machine, args.upload.clone(), args.scale);

    let event_loop = match EventLoop::new() {
        Ok(el) => el,
        Err(e) => {
            eprintln!("Failed to create event loop: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = event_loop.run_app(&mut app) {
        eprintln!("Event loop error: {e}");
        process::exit(1);
    }
}

use std::{
    time::Duration,
    thread,
    sync::{
        Arc,
        Mutex,
        atomic::{ AtomicBool, AtomicU64, Ordering },
        mpsc,
    },
};

use crossterm::{
    terminal::{ self, EnterAlternateScreen, LeaveAlternateScreen, enable_raw_mode, disable_raw_mode, SetTitle, },
    cursor::{ SavePosition, RestorePosition, Show, Hide },
    execute,
    event::{
        self,
        Event,
        KeyModifiers,
        KeyCode, KeyEventKind,
    },
};

use crate::grid::Grid;

type Err = Box<dyn std::error::Error>;
type Result<T> = std::result::Result<T, Err>;

const MIN_DELAY_MS: u64 = 10;
const MAX_DELAY_MS: u64 = 4000;

pub struct App {
    pub grid: Mutex<Grid>,
    pub should_exit: AtomicBool,
    pub pause: AtomicBool,
    pub upd_timeout: AtomicU64,
}

impl App {

    #[inline]
    pub fn new(grid: Grid, upd_timeout: u64) -> Self {
        App {
            grid: Mutex::new(grid),
            should_exit: false.into(),
            pause: false.into(),
            upd_timeout: upd_timeout.into(),
        }
    }

    #[inline]
    pub fn should_exit(&self) -> bool {
        self.should_exit.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn pause(&self) -> bool {
        self.pause.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn upd_timeout(&self) -> u64 {
        self.upd_timeout.load(Ordering::Relaxed)
    }

}

pub fn run(a: App) -> Result<()> {

    let (w, h) = terminal::size()?;
    let side = a.grid.lock().unwrap().size();
    if (w as usize) < side || (h as usize) < side {
        return Err(format!(
            "terminal ({w}x{h}) is smaller than the grid ({side}x{side})",
        ).into());
    }

    runup()?;
    clear()?;
    let d = draw(a);
    shutdown()?;
    d?;
    Ok(())
}

fn runup() -> Result<()> {
    execute!(std::io::stderr(), EnterAlternateScreen, SetTitle("gridlife"), Hide)?;
    enable_raw_mode()?;
    clear()?;
    execute!(std::io::stdout(), SavePosition)?;
    Ok(())
}

fn shutdown() -> Result<()> {
    execute!(std::io::stderr(), LeaveAlternateScreen, Show)?;
    disable_raw_mode()?;
    Ok(())
}

fn draw(a: App) -> Result<()> {
    // At most one generation in flight, so the tick thread cannot race
    // ahead of the renderer.
    let (tx, rx) = mpsc::sync_channel(1);
    let a = Arc::new(a);

    let arc_ticks = Arc::clone(&a);
    let arc_keys = Arc::clone(&a);

    let _ = thread::Builder::new().name("Tick machine".into()).spawn(move || {
        while !arc_ticks.should_exit() {
            let snapshot = {
                let mut grid = arc_ticks.grid.lock().unwrap();
                let snapshot = grid.clone();
                // Wholesale replacement, never an in-place update.
                let next = snapshot.step();
                *grid = next;
                snapshot
            };
            if tx.send(snapshot).is_err() {
                break
            }
        }
    });

    let _ = thread::Builder::new().name("Keyboard input".into()).spawn(move || {
        let a = arc_keys;
        while !a.should_exit() {
            let _ = hotkeys(&a);
        }
    });

    loop {

        if a.should_exit() {
            break
        }

        if a.pause() {
            sleep_ms(50);
            continue
        }

        let Ok(grid) = rx.recv() else {
            break
        };

        sleep_ms(a.upd_timeout());
        clear()?;
        for row in grid.rows() {
            for cell in row {
                if *cell {
                    print!("#");
                } else {
                    print!(" ");
                }
            }
            print!("\n\r");
        }

    }
    Ok(())
}

fn clear() -> Result<()> {
    use terminal::{ Clear, ClearType };
    use std::io::stdout;

    execute!(stdout(), Clear(ClearType::Purge))?;
    execute!(stdout(), RestorePosition)?;
    Ok(())
}

fn sleep_ms(t: u64) {
    thread::sleep(Duration::from_millis(t))
}


fn hotkeys(a: &Arc<App>) -> Result<()> {
    if event::poll(Duration::from_millis(150))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    match key.code {
                        KeyCode::Char('c') => a.should_exit.store(true, Ordering::Relaxed),
                        _ => {},
                    }
                } else {
                    match key.code {
                        KeyCode::Char('p') => {
                            let p = a.pause();
                            a.pause.store(!p, Ordering::Relaxed);
                        },
                        KeyCode::Char('j') => {
                            let t = a.upd_timeout();
                            a.upd_timeout.store((t / 2).max(MIN_DELAY_MS), Ordering::Relaxed);
                        },
                        KeyCode::Char('k') => {
                            let t = a.upd_timeout();
                            a.upd_timeout.store((t * 2).min(MAX_DELAY_MS), Ordering::Relaxed);
                        },
                        _ => {},
                    }
                }
            }
        }
    }
    Ok(())
}

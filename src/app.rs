use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::config::{Config, MAX_REFRESH_SECS, MIN_REFRESH_SECS, clamp_refresh_secs, parse_key};
use crate::system::collector::Collector;
use crate::system::host::{HostInfo, HostLoad};
use crate::system::meminfo::MemInfo;
use crate::system::snapshot::TickReport;
use crate::system::source::{ProcFs, ProcSource};
use crate::ui::theme::Theme;

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub pause: KeyCode,
    pub faster: KeyCode,
    pub slower: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            pause: parse_key(&kb.pause).unwrap_or(KeyCode::Char('p')),
            faster: parse_key(&kb.faster).unwrap_or(KeyCode::Char('+')),
            slower: parse_key(&kb.slower).unwrap_or(KeyCode::Char('-')),
        }
    }

    /// (key_label, description) pairs for the status bar.
    pub fn hints(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.pause), "Pause"),
            (key_label(self.faster), "Faster"),
            (key_label(self.slower), "Slower"),
        ]
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        _ => "?".to_string(),
    }
}

/// Drives the sample, rank and display cycle and owns every piece of state
/// that lives longer than one tick.
pub struct App<S: ProcSource = ProcFs> {
    pub running: bool,
    pub paused: bool,
    pub refresh_secs: u64,
    pub collector: Collector<S>,
    pub report: TickReport,
    pub memory: Option<MemInfo>,
    pub host: HostInfo,
    pub load: HostLoad,
    pub now: DateTime<Local>,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
}

impl App {
    pub fn new(config: Config) -> Self {
        let collector = Collector::new(
            ProcFs::new(config.general.proc_root.clone()),
            config.general.top_n,
        );
        App::with_collector(collector, &config)
    }
}

impl<S: ProcSource> App<S> {
    pub fn with_collector(collector: Collector<S>, config: &Config) -> Self {
        App {
            running: true,
            paused: config.general.start_paused,
            refresh_secs: clamp_refresh_secs(config.general.refresh_secs),
            collector,
            report: TickReport::default(),
            memory: None,
            host: HostInfo::detect(),
            load: HostLoad::default(),
            now: Local::now(),
            theme: Theme::from_config(&config.colors.theme),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    /// One cycle. While paused the process table is neither scanned nor
    /// re-baselined and the last report stays on screen.
    pub fn tick(&mut self) {
        if self.paused {
            self.collector.observe_paused();
        } else {
            self.report = self.collector.sample();
        }
        self.memory = self.collector.memory();
        self.load = self.collector.host_load().unwrap_or_default();
        self.now = Local::now();
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        let code = key.code;
        let kb = &self.keybinds;

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.pause {
            return Action::TogglePause;
        }
        if code == kb.faster {
            return Action::SpeedUp;
        }
        if code == kb.slower {
            return Action::SlowDown;
        }

        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::TogglePause => self.paused = !self.paused,
            Action::SpeedUp => {
                self.refresh_secs = self.refresh_secs.saturating_sub(1).max(MIN_REFRESH_SECS);
            }
            Action::SlowDown => {
                self.refresh_secs = (self.refresh_secs + 1).min(MAX_REFRESH_SECS);
            }
            Action::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeybindsConfig;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Procfs tree under the temp dir, removed on drop.
    struct TempProc(PathBuf);

    impl TempProc {
        fn new(name: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "topcpu_app_{name}_{}",
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(&root).unwrap();
            TempProc(root)
        }

        fn path(&self) -> &Path {
            &self.0
        }

        fn set_system_total(&self, total: u64) {
            fs::write(self.0.join("stat"), format!("cpu  {total} 0 0 0 0 0 0 0\n")).unwrap();
        }

        fn set_process(&self, pid: u32, name: &str, utime: u64) {
            let dir = self.0.join(pid.to_string());
            fs::create_dir_all(&dir).unwrap();
            let record = format!("{pid} ({name}) R 1 {pid} {pid} 0 -1 0 0 0 0 0 {utime} 0 0 0 20 0\n");
            fs::write(dir.join("stat"), record).unwrap();
        }
    }

    impl Drop for TempProc {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn make_test_app(root: &str) -> App {
        let config = Config::default();
        let collector = Collector::new(ProcFs::new(root), 5);
        App::with_collector(collector, &config)
    }

    #[test]
    fn default_keybinds_map_to_controls() {
        let app = make_test_app("/nonexistent/proc");

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::TogglePause);

        let key = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::SpeedUp);

        let key = KeyEvent::new(KeyCode::Char('-'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::SlowDown);

        let key = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);

        // Ctrl+C always quits
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);
    }

    #[test]
    fn custom_keybind_remap_works() {
        let mut app = make_test_app("/nonexistent/proc");
        app.keybinds = ResolvedKeybinds::from_config(&KeybindsConfig {
            quit: "x".to_string(),
            pause: "Space".to_string(),
            faster: "not-a-key".to_string(),
            slower: "-".to_string(),
        });

        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::TogglePause);

        // Unparseable binding falls back to the default
        let key = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::SpeedUp);

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);
    }

    #[test]
    fn interval_stays_within_bounds() {
        let mut app = make_test_app("/nonexistent/proc");
        assert_eq!(app.refresh_secs, 1);

        app.dispatch(Action::SpeedUp);
        assert_eq!(app.refresh_secs, 1);

        for _ in 0..20 {
            app.dispatch(Action::SlowDown);
        }
        assert_eq!(app.refresh_secs, 10);
        assert_eq!(app.refresh_interval(), Duration::from_secs(10));

        app.dispatch(Action::SpeedUp);
        assert_eq!(app.refresh_secs, 9);
    }

    #[test]
    fn pause_toggles_and_quit_stops() {
        let mut app = make_test_app("/nonexistent/proc");
        assert!(!app.paused);
        app.dispatch(Action::TogglePause);
        assert!(app.paused);
        app.dispatch(Action::TogglePause);
        assert!(!app.paused);

        app.dispatch(Action::Quit);
        assert!(!app.running);
    }

    #[test]
    fn tick_without_procfs_is_not_fatal() {
        let mut app = make_test_app("/nonexistent/proc");
        app.tick();
        assert!(app.report.ranked.is_empty());
        assert_eq!(app.report.considered, 0);
        assert!(app.memory.is_none());
    }

    #[test]
    fn paused_ticks_freeze_the_table_and_advance_the_counter() {
        let procfs = TempProc::new("pause");
        procfs.set_system_total(0);
        let mut app = make_test_app(procfs.path().to_str().unwrap());

        procfs.set_system_total(100);
        procfs.set_process(42, "stress", 10);
        app.tick();
        assert_eq!(app.report.system_delta, 100);
        assert_eq!(app.report.ranked[0].cpu_percent, 10.0);

        app.dispatch(Action::TogglePause);
        procfs.set_system_total(150);
        procfs.set_process(42, "stress", 30);
        procfs.set_process(43, "newcomer", 5);
        app.tick();
        // Last active report stays; no baseline moved.
        assert_eq!(app.report.considered, 1);
        assert_eq!(app.report.ranked[0].cpu_percent, 10.0);
        assert_eq!(app.collector.baselines().get(42), 10);
        assert_eq!(app.collector.baselines().get(43), 0);

        app.dispatch(Action::TogglePause);
        procfs.set_system_total(200);
        procfs.set_process(42, "stress", 35);
        app.tick();
        // 25 ticks of process time over the 50 since the paused cycle.
        assert_eq!(app.report.system_delta, 50);
        assert_eq!(app.report.considered, 2);
        assert_eq!(app.report.ranked[0].pid, 42);
        assert_eq!(app.report.ranked[0].cpu_percent, 50.0);
        assert_eq!(app.collector.baselines().get(42), 35);
    }

    #[test]
    fn host_load_follows_the_proc_root() {
        let procfs = TempProc::new("load");
        procfs.set_system_total(0);
        fs::write(procfs.path().join("uptime"), "90061.20 1.00\n").unwrap();
        fs::write(procfs.path().join("loadavg"), "3.00 2.00 1.00 2/99 123\n").unwrap();

        let mut app = make_test_app(procfs.path().to_str().unwrap());
        app.tick();
        assert_eq!(app.load.uptime_secs, 90_061);
        assert_eq!(app.load.load_average, [3.0, 2.0, 1.0]);
    }

    #[test]
    fn hints_list_every_control() {
        let app = make_test_app("/nonexistent/proc");
        let labels: Vec<String> = app.keybinds.hints().into_iter().map(|(k, _)| k).collect();
        assert_eq!(labels, vec!["q", "p", "+", "-"]);
    }
}

use melodex::{Settings, app_core::Melodex};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    let mut clog = colog::default_builder();
    clog.filter(None, settings.log_level);
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{thread_name}': {panic_info}");
    }));

    Melodex::new(settings)?.run()
}

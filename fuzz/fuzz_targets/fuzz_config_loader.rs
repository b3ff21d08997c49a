#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing and validation may reject input but must never panic.
    if let Ok(cfg) = toml::from_str::<wodtimer_config::Config>(data) {
        if cfg.validate().is_ok() {
            // Anything that validates must be accepted by the engine builder.
            let engine_cfg: wodtimer_core::EngineCfg = (&cfg.timer).into();
            assert!(
                wodtimer_core::TimerEngine::builder()
                    .with_config(engine_cfg)
                    .try_build()
                    .is_ok()
            );
        }
    }
});

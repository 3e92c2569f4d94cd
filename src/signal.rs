//! Ctrl+C による協調的な中断

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// 中断要求フラグ
///
/// エンジンはファイルを変更する直前にこのフラグを確認し、
/// リンク作成の途中では中断しない。
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Ctrl+C ハンドラを登録する
///
/// 2回目以降の呼び出しでは登録済みのハンドラを返す。
/// 他所で既にハンドラが登録されている場合は、シグナルに紐付かないハンドラを返す。
pub fn install_handler() -> ShutdownHandler {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return handler.clone();
    }

    let handler = ShutdownHandler::new();
    let flag = Arc::clone(&handler.flag);
    match ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        log::warn!("interrupt received, stopping before the next file is modified");
    }) {
        Ok(()) => {}
        Err(e) => log::debug!("Ctrl+C handler not installed: {}", e),
    }
    GLOBAL_HANDLER.get_or_init(|| handler).clone()
}

use crate::domain::ports::Clock;
use chrono::NaiveDateTime;

/// 使用本地時間，報告檔名以產生當下的本地時間命名
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

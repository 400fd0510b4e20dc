use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::{error, info};
use std::future::Future;
use std::time::Duration;

/// How often the loop wakes up to check the due list.
const POLL_INTERVAL: Duration = Duration::from_secs(10);

const DEFAULT_TIMES: [&str; 3] = ["08:00", "12:00", "20:00"];

#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub at: NaiveTime,
    last_fired: Option<NaiveDate>,
}

/// Fixed wall-clock schedule. One state ("waiting"): when a due time is
/// reached the stage runs to completion, then the loop goes back to
/// waiting. Times that pass while the process is down are skipped, never
/// caught up.
#[derive(Debug)]
pub struct Scheduler {
    entries: Vec<ScheduleEntry>,
}

impl Scheduler {
    pub fn new(times: Vec<NaiveTime>) -> Self {
        let entries = times
            .into_iter()
            .map(|at| ScheduleEntry {
                at,
                last_fired: None,
            })
            .collect();
        Self { entries }
    }

    /// `SCHEDULE_TIMES` as a comma list of `HH:MM`, defaulting to
    /// 08:00/12:00/20:00 local time.
    pub fn from_env() -> anyhow::Result<Self> {
        let raw = std::env::var("SCHEDULE_TIMES")
            .unwrap_or_else(|_| DEFAULT_TIMES.join(","));
        let times = parse_times(&raw)?;
        Ok(Self::new(times))
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Indices of entries whose time has passed today and which have not
    /// fired today. Pure over `now`, so the due logic tests without sleeping.
    pub fn due(&self, now: NaiveDateTime) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.at <= now.time() && e.last_fired != Some(now.date()))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn mark_fired(&mut self, idx: usize, date: NaiveDate) {
        if let Some(entry) = self.entries.get_mut(idx) {
            entry.last_fired = Some(date);
        }
    }

    /// Entries already past at startup count as fired: a due time that
    /// passed while the process was not running is simply skipped.
    pub fn skip_past(&mut self, now: NaiveDateTime) {
        for entry in &mut self.entries {
            if entry.at <= now.time() {
                entry.last_fired = Some(now.date());
            }
        }
    }

    /// Poll forever. The stage runs synchronously, so invocations never
    /// overlap; a failed run is logged and left for the next due time.
    pub async fn run_loop<F, Fut>(&mut self, mut stage: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        info!(
            "scheduler waiting; times = {}",
            self.entries
                .iter()
                .map(|e| e.at.format("%H:%M").to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        loop {
            let now = Local::now().naive_local();
            for idx in self.due(now) {
                info!("scheduled run starting ({})", self.entries[idx].at.format("%H:%M"));
                if let Err(e) = stage().await {
                    error!("scheduled run failed: {e:#}");
                }
                self.mark_fired(idx, now.date());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

fn parse_times(raw: &str) -> anyhow::Result<Vec<NaiveTime>> {
    let mut times = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let t = NaiveTime::parse_from_str(part, "%H:%M")
            .map_err(|e| anyhow::anyhow!("invalid schedule time {part:?}: {e}"))?;
        times.push(t);
    }
    if times.is_empty() {
        anyhow::bail!("schedule has no times");
    }
    Ok(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn when(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 25)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn entry_becomes_due_once_per_day() {
        let mut sched = Scheduler::new(vec![at(8, 0), at(12, 0), at(20, 0)]);

        assert!(sched.due(when(7, 59)).is_empty());
        assert_eq!(sched.due(when(8, 0)), vec![0]);

        sched.mark_fired(0, when(8, 0).date());
        assert!(sched.due(when(8, 5)).is_empty());

        // Next poll after noon picks up only the second entry.
        assert_eq!(sched.due(when(12, 0)), vec![1]);

        // A new day re-arms everything already fired.
        let tomorrow = when(8, 0) + chrono::Duration::days(1);
        assert_eq!(sched.due(tomorrow), vec![0]);
    }

    #[test]
    fn skip_past_drops_missed_times_without_catch_up() {
        let mut sched = Scheduler::new(vec![at(8, 0), at(12, 0), at(20, 0)]);
        sched.skip_past(when(13, 30));

        assert!(sched.due(when(13, 30)).is_empty());
        assert_eq!(sched.due(when(20, 0)), vec![2]);
    }

    #[test]
    fn parses_env_style_time_list() {
        let times = parse_times("08:00, 12:00,20:00").unwrap();
        assert_eq!(times, vec![at(8, 0), at(12, 0), at(20, 0)]);

        assert!(parse_times("25:99").is_err());
        assert!(parse_times("").is_err());
    }
}

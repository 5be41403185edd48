use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<String, Instant>,
    phase_durations: BTreeMap<String, Duration>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: BTreeMap::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let start_time = self.phase_start_times.remove(phase_name)?;
        let duration = start_time.elapsed();
        self.phase_durations
            .insert(phase_name.to_string(), duration);
        Some(duration)
    }

    /// 获取总执行时间
    pub fn total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 各阶段耗时（毫秒）
    pub fn phase_millis(&self) -> BTreeMap<String, u64> {
        self.phase_durations
            .iter()
            .map(|(phase, duration)| (phase.clone(), duration.as_millis() as u64))
            .collect()
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_timing() {
        let mut timing = TimingScope::new();
        timing.start_phase("breach_facts");
        std::thread::sleep(Duration::from_millis(5));
        let elapsed = timing.end_phase("breach_facts").unwrap();

        assert!(elapsed >= Duration::from_millis(5));
        assert!(timing.phase_millis()["breach_facts"] >= 5);
        assert!(timing.end_phase("unknown").is_none());
        assert!(timing.generate_timing_report().contains("breach_facts"));
    }
}

use crate::models::interview::QaRecord;

pub struct GradingService;

impl GradingService {
    /// Mean answer score rounded to one decimal; an empty history scores 0.
    pub fn final_score(history: &[QaRecord]) -> f64 {
        if history.is_empty() {
            return 0.0;
        }
        let total: u32 = history.iter().map(|qa| u32::from(qa.score.min(10))).sum();
        let mean = f64::from(total) / history.len() as f64;
        ((mean * 10.0).round() / 10.0).clamp(0.0, 10.0)
    }

    /// Indices of the best and weakest answers, best first.
    pub fn rank(history: &[QaRecord]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..history.len()).collect();
        order.sort_by(|&a, &b| history[b].score.cmp(&history[a].score).then(a.cmp(&b)));
        order
    }
}

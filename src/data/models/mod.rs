pub mod deck_models;
pub mod review_models;
pub mod srs_models;

pub use deck_models::{CardContent, TriviaContent};
pub use review_models::{
    BulkItemResult, BulkReviewItem, BulkReviewRequest, BulkReviewResult, DashboardStats,
    InitializationResult, InitializeItemsRequest, QueueParams, ReviewError, ReviewOutcome,
    ReviewSubmission, StatsParams, StatusBreakdown, StudyQueue, StudyQueueEntry, StudyStats,
};
pub use srs_models::{
    CardStatisticRow, NewCardReview, NewCardStatistic, NewQuestionReview, NewQuestionStatistic,
    QuestionStatisticRow, ReviewRecord, ReviewStatus, ReviewableStatistic,
    INITIAL_EASINESS_FACTOR, MIN_EASINESS_FACTOR,
};

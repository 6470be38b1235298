//! Batch driver
//!
//! Iterates the per-topic workflow over a topic list with an inter-topic
//! delay. The delay exists purely to avoid upstream rate limiting; there is
//! no coordination between topics.

use super::workflow::{ContentPipeline, TopicReport, TopicStatus};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Built-in topic list used when no topics file is supplied
pub const DEFAULT_TOPICS: &[&str] = &[
    // AI in specific industries
    "The Role of AI in Revolutionizing Healthcare Diagnostics",
    "AI in Education: Personalized Learning and Adaptive Assessments",
    "Artificial Intelligence in Agriculture: Enhancing Crop Management",
    "AI in Finance: Fraud Detection and Risk Management",
    "AI in Transportation: Autonomous Vehicles and Traffic Optimization",
    "AI in Marketing: Personalization and Behavioral Targeting",
    "The Impact of AI on Modern Warfare and Defense Strategies",
    // Ethical and social implications
    "Ethical Challenges in Artificial Intelligence Development",
    "Addressing Algorithmic Bias in AI Systems",
    "The Future of Work: How AI is Reshaping the Labor Market",
    "Privacy Concerns in the Age of AI-Powered Surveillance",
    "Can Artificial Intelligence Be Fair? Exploring Ethical Algorithms",
    // Emerging technologies and trends
    "Explainable AI: Bridging the Gap Between Humans and Machines",
    "Quantum Computing and Its Implications for AI Development",
    "Generative AI: From Deepfakes to Creative Content Creation",
    "Edge Computing with AI: Bringing Intelligence to the Edge Devices",
    // AI applications and innovations
    "Natural Language Processing for Sentiment Analysis on Social Media",
    "Machine Learning in Predictive Analytics for Business Decision-Making",
    "Computer Vision Applications: From Facial Recognition to Autonomous Drones",
    "Reinforcement Learning in Robotics for Real-World Applications",
    // AI for global challenges
    "Using AI to Predict and Mitigate Climate Change Impacts",
    "AI in Disaster Management: Enhancing Emergency Response Systems",
    "Fighting Fake News with Artificial Intelligence Detection Tools",
    "Smart Cities Powered by AI: Improving Urban Sustainability",
    // Creative and cultural aspects
    "The Role of AI in Art, Music, and Literature: Creativity Redefined",
];

/// Batch run parameters
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Number of topics to process
    pub articles: usize,
    /// Articles generated per topic
    pub per_topic_limit: usize,
    /// Delay between topics
    pub delay: Duration,
    /// Explicit topic list; the built-in list is cycled when absent
    pub topics: Option<Vec<String>>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            articles: 5,
            per_topic_limit: 1,
            delay: Duration::from_secs(5),
            topics: None,
        }
    }
}

/// Aggregated result of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub total_topics: usize,
    pub successful_topics: usize,
    pub failed_topics: usize,
    pub total_articles: usize,
    pub results: Vec<TopicReport>,
}

impl BatchReport {
    /// True when every topic succeeded
    pub fn all_succeeded(&self) -> bool {
        self.failed_topics == 0
    }
}

/// Resolve the topic list for a run, cycling the source list when more
/// topics are requested than available.
fn resolve_topics(options: &BatchOptions) -> Vec<String> {
    match &options.topics {
        Some(topics) => topics
            .iter()
            .cycle()
            .take(options.articles)
            .cloned()
            .collect(),
        None => DEFAULT_TOPICS
            .iter()
            .cycle()
            .take(options.articles)
            .map(|t| t.to_string())
            .collect(),
    }
}

/// Run the pipeline over a topic list, aggregating per-topic reports.
pub async fn run_batch(pipeline: &ContentPipeline, options: &BatchOptions) -> BatchReport {
    let topics = resolve_topics(options);
    tracing::info!("Starting batch run for {} topics", topics.len());

    let mut results = Vec::with_capacity(topics.len());
    let mut successful_topics = 0;
    let mut failed_topics = 0;
    let mut total_articles = 0;

    let total = topics.len();
    for (i, topic) in topics.iter().enumerate() {
        tracing::info!("Processing topic {}/{}: {}", i + 1, total, topic);

        let report = pipeline.run_topic(topic, options.per_topic_limit).await;
        total_articles += report.articles_processed;

        if report.status == TopicStatus::Completed && report.articles_processed > 0 {
            successful_topics += 1;
        } else {
            failed_topics += 1;
            tracing::error!("Failed to process topic: {}", topic);
            if let Some(ref error) = report.error {
                tracing::error!("Error: {}", error);
            }
        }

        results.push(report);
        tracing::info!("Progress: {}/{} topics successful", successful_topics, i + 1);

        if i + 1 < total && !options.delay.is_zero() {
            tracing::info!(
                "Waiting {} seconds before next topic",
                options.delay.as_secs()
            );
            tokio::time::sleep(options.delay).await;
        }
    }

    tracing::info!(
        "Batch processing completed: {}/{} topics successful",
        successful_topics,
        total
    );

    BatchReport {
        total_topics: total,
        successful_topics,
        failed_topics,
        total_articles,
        results,
    }
}

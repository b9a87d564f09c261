// src/seed.rs

//! One-time reference-data seed, run at startup when the tables are empty.
//!
//! Curriculum (chapters/lessons per domain) and a starter question bank.
//! Users and progress rows are never seeded.

use sqlx::SqlitePool;

use crate::error::AppError;

struct ChapterSeed {
    domain: &'static str,
    number: i64,
    title: &'static str,
    description: &'static str,
    lessons: &'static [&'static str],
}

const CURRICULUM: &[ChapterSeed] = &[
    ChapterSeed {
        domain: "MLOps",
        number: 1,
        title: "Introduction to MLOps",
        description: "Fundamentals of Machine Learning Operations",
        lessons: &["What is MLOps?", "The ML Lifecycle", "MLOps vs DevOps"],
    },
    ChapterSeed {
        domain: "MLOps",
        number: 2,
        title: "Data Management",
        description: "Managing data pipelines and versioning",
        lessons: &["Data Versioning", "Feature Stores", "Data Validation"],
    },
    ChapterSeed {
        domain: "MLOps",
        number: 3,
        title: "Model Deployment",
        description: "Production deployment techniques",
        lessons: &["Serving Patterns", "Containerizing Models", "Rollouts and Rollbacks"],
    },
    ChapterSeed {
        domain: "MLOps",
        number: 4,
        title: "Monitoring & Observability",
        description: "Model performance monitoring",
        lessons: &["Drift Detection", "Model Metrics", "Alerting on Degradation"],
    },
    ChapterSeed {
        domain: "AIOps",
        number: 1,
        title: "Introduction to AIOps",
        description: "Fundamentals of Artificial Intelligence for IT Operations",
        lessons: &["What is AIOps?", "AIOps Use Cases", "The AIOps Toolchain"],
    },
    ChapterSeed {
        domain: "AIOps",
        number: 2,
        title: "Anomaly Detection",
        description: "AI-powered anomaly detection techniques",
        lessons: &["Metrics and Baselines", "Detecting Outliers", "Reducing Alert Noise"],
    },
    ChapterSeed {
        domain: "AIOps",
        number: 3,
        title: "Automated Remediation",
        description: "Self-healing systems and automation",
        lessons: &["Runbook Automation", "Event Correlation", "Closing the Loop"],
    },
];

struct McqSeed {
    question: &'static str,
    options: [&'static str; 4],
    correct: &'static str,
    category: &'static str,
    domain: &'static str,
    level: &'static str,
}

const MCQ_BANK: &[McqSeed] = &[
    McqSeed {
        question: "What does AIOps stand for?",
        options: [
            "Artificial Intelligence Operations",
            "Automated IT Operations",
            "Advanced Infrastructure Ops",
            "Application Intelligence Operations",
        ],
        correct: "Artificial Intelligence Operations",
        category: "Fundamentals",
        domain: "AIOps",
        level: "beginner",
    },
    McqSeed {
        question: "What type of data does AIOps primarily analyze?",
        options: [
            "Financial data",
            "Machine logs and metrics",
            "Customer feedback",
            "Marketing data",
        ],
        correct: "Machine logs and metrics",
        category: "Data Analysis",
        domain: "AIOps",
        level: "beginner",
    },
    McqSeed {
        question: "What is anomaly detection in AIOps?",
        options: [
            "Detecting hardware failures",
            "Identifying unusual patterns in IT data",
            "Finding software bugs",
            "Monitoring user behavior",
        ],
        correct: "Identifying unusual patterns in IT data",
        category: "Monitoring",
        domain: "AIOps",
        level: "beginner",
    },
    McqSeed {
        question: "What does MTTR stand for in IT operations?",
        options: [
            "Maximum Time To Response",
            "Mean Time To Recovery",
            "Minimum Time To Restart",
            "Monthly Technical Time Report",
        ],
        correct: "Mean Time To Recovery",
        category: "Metrics",
        domain: "AIOps",
        level: "beginner",
    },
    McqSeed {
        question: "What does MLOps stand for?",
        options: [
            "Machine Learning Operations",
            "Multi-Level Operations",
            "Modern Logic Operations",
            "Managed Learning Operations",
        ],
        correct: "Machine Learning Operations",
        category: "Fundamentals",
        domain: "MLOps",
        level: "beginner",
    },
    McqSeed {
        question: "What is the primary goal of MLOps?",
        options: [
            "To create ML models",
            "To streamline ML model deployment and lifecycle",
            "To collect training data",
            "To visualize results",
        ],
        correct: "To streamline ML model deployment and lifecycle",
        category: "Goals",
        domain: "MLOps",
        level: "beginner",
    },
    McqSeed {
        question: "Which stage comes after model training in MLOps?",
        options: [
            "Data collection",
            "Model validation",
            "Feature engineering",
            "Problem definition",
        ],
        correct: "Model validation",
        category: "Lifecycle",
        domain: "MLOps",
        level: "beginner",
    },
    McqSeed {
        question: "What is model drift?",
        options: [
            "A model changing its architecture",
            "Degrading model performance as live data diverges from training data",
            "Moving a model between clouds",
            "A versioning conflict",
        ],
        correct: "Degrading model performance as live data diverges from training data",
        category: "Monitoring",
        domain: "MLOps",
        level: "intermediate",
    },
    McqSeed {
        question: "What is the main purpose of CI/CD in DevOps?",
        options: [
            "Cost management",
            "Automating build, test and release",
            "Writing documentation",
            "Managing licenses",
        ],
        correct: "Automating build, test and release",
        category: "CI/CD",
        domain: "DevOps",
        level: "beginner",
    },
    McqSeed {
        question: "Which tool is commonly used for container orchestration?",
        options: ["Kubernetes", "Photoshop", "Excel", "Figma"],
        correct: "Kubernetes",
        category: "Containers",
        domain: "DevOps",
        level: "beginner",
    },
    McqSeed {
        question: "What is infrastructure as code?",
        options: [
            "Writing application code on servers",
            "Managing infrastructure through machine-readable definition files",
            "A programming language",
            "Manual server configuration",
        ],
        correct: "Managing infrastructure through machine-readable definition files",
        category: "IaC",
        domain: "DevOps",
        level: "beginner",
    },
    McqSeed {
        question: "What does a blue-green deployment provide?",
        options: [
            "Cheaper hosting",
            "Zero-downtime releases with fast rollback",
            "Automatic database migrations",
            "Better compression",
        ],
        correct: "Zero-downtime releases with fast rollback",
        category: "Deployment",
        domain: "DevOps",
        level: "intermediate",
    },
];

struct CodeSeed {
    title: &'static str,
    description: &'static str,
    language: &'static str,
    domain: &'static str,
    level: &'static str,
    category: &'static str,
    starter_code: &'static str,
    test_cases: &'static str, // JSON array
}

const CODE_BANK: &[CodeSeed] = &[
    CodeSeed {
        title: "Model Accuracy",
        description: "Write a function accuracy(correct, total) that returns the rounded \
                      accuracy percentage as an integer. Return 0 when total is 0.",
        language: "python",
        domain: "MLOps",
        level: "beginner",
        category: "Metrics",
        starter_code: "def accuracy(correct, total):\n    # your code here\n    pass\n",
        test_cases: r#"[
            {"input": "accuracy(7, 10)", "expectedOutput": "70", "description": "simple ratio"},
            {"input": "accuracy(2, 3)", "expectedOutput": "67", "description": "rounds up"},
            {"input": "accuracy(0, 0)", "expectedOutput": "0", "description": "empty set"}
        ]"#,
    },
    CodeSeed {
        title: "Error Rate Alert",
        description: "Write a function should_alert(errors, requests, threshold) that returns \
                      True when the error rate strictly exceeds the threshold percentage.",
        language: "python",
        domain: "AIOps",
        level: "beginner",
        category: "Monitoring",
        starter_code: "def should_alert(errors, requests, threshold):\n    # your code here\n    pass\n",
        test_cases: r#"[
            {"input": "should_alert(10, 100, 5)", "expectedOutput": "True", "description": "above threshold"},
            {"input": "should_alert(1, 100, 5)", "expectedOutput": "False", "description": "below threshold"}
        ]"#,
    },
];

/// Idempotent: a non-empty chapters table means the seed already ran.
pub async fn seed_reference_data(pool: &SqlitePool) -> Result<(), AppError> {
    let chapters: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters")
        .fetch_one(pool)
        .await?;

    if chapters > 0 {
        tracing::info!("Reference data already seeded.");
        return Ok(());
    }

    tracing::info!("Seeding curriculum and question bank...");

    for chapter in CURRICULUM {
        let chapter_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO chapters (domain, chapter_number, title, description, total_lessons)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(chapter.domain)
        .bind(chapter.number)
        .bind(chapter.title)
        .bind(chapter.description)
        .bind(chapter.lessons.len() as i64)
        .fetch_one(pool)
        .await?;

        for (i, title) in chapter.lessons.iter().enumerate() {
            let video_id = format!(
                "{}-c{}-l{}",
                chapter.domain.to_lowercase(),
                chapter.number,
                i + 1
            );
            sqlx::query(
                r#"
                INSERT INTO lessons
                    (chapter_id, domain, lesson_number, title, video_url, video_id, duration, description)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(chapter_id)
            .bind(chapter.domain)
            .bind((i + 1) as i64)
            .bind(title)
            .bind(format!("https://www.youtube.com/watch?v={}", video_id))
            .bind(&video_id)
            .bind("10 min")
            .bind(format!("Chapter {} - {}", chapter.number, title))
            .execute(pool)
            .await?;
        }
    }

    for mcq in MCQ_BANK {
        sqlx::query(
            r#"
            INSERT INTO mcq_questions
                (question, options, correct_answer, category, domain, experience_level)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(mcq.question)
        .bind(serde_json::to_string(&mcq.options)?)
        .bind(mcq.correct)
        .bind(mcq.category)
        .bind(mcq.domain)
        .bind(mcq.level)
        .execute(pool)
        .await?;
    }

    for code in CODE_BANK {
        // Validate the embedded JSON up front rather than failing on read.
        let cases: serde_json::Value = serde_json::from_str(code.test_cases)?;
        sqlx::query(
            r#"
            INSERT INTO code_questions
                (title, description, language, domain, experience_level, category, starter_code, test_cases)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(code.title)
        .bind(code.description)
        .bind(code.language)
        .bind(code.domain)
        .bind(code.level)
        .bind(code.category)
        .bind(code.starter_code)
        .bind(cases.to_string())
        .execute(pool)
        .await?;
    }

    tracing::info!("Seed complete.");
    Ok(())
}

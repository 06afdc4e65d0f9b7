//! Sample catalog for demos and local development

use sqlx::SqlitePool;

use crate::backend::catalog::db::{create_book, create_chapter};
use crate::shared::catalog::{BookDraft, ChapterDraft};

struct SampleBook {
    title: &'static str,
    author: &'static str,
    description: &'static str,
    category: &'static str,
    cover_image: &'static str,
    chapters: &'static [SampleChapter],
}

struct SampleChapter {
    title: &'static str,
    summary: &'static str,
    read_time_minutes: i64,
}

const SAMPLE_BOOKS: &[SampleBook] = &[
    SampleBook {
        title: "Atomic Habits",
        author: "James Clear",
        description: "An Easy & Proven Way to Build Good Habits & Break Bad Ones. Tiny changes, remarkable results.",
        category: "Self-Help",
        cover_image: "https://images-na.ssl-images-amazon.com/images/I/51Tlm0GZTXL.jpg",
        chapters: &[
            SampleChapter {
                title: "The Surprising Power of Atomic Habits",
                summary: "Small changes can have remarkable results. When you improve by just 1% each day, those gains compound over time. The aggregation of marginal gains leads to significant improvements. Conversely, small negative habits compound into toxic results. Success is the product of daily habits, not once-in-a-lifetime transformations.",
                read_time_minutes: 5,
            },
            SampleChapter {
                title: "How Your Habits Shape Your Identity",
                summary: "There are three levels of change: outcome, process, and identity. The most effective way to change your habits is to focus on who you wish to become, not what you want to achieve. Your identity emerges from your habits. Every action is a vote for the type of person you wish to become.",
                read_time_minutes: 6,
            },
            SampleChapter {
                title: "The Four Laws of Behavior Change",
                summary: "The process of building a habit can be divided into four steps: cue, craving, response, and reward. The Four Laws of Behavior Change: (1) Make it obvious, (2) Make it attractive, (3) Make it easy, (4) Make it satisfying. These laws can be inverted to break bad habits.",
                read_time_minutes: 5,
            },
        ],
    },
    SampleBook {
        title: "Thinking, Fast and Slow",
        author: "Daniel Kahneman",
        description: "A groundbreaking tour of the mind that explains the two systems that drive the way we think.",
        category: "Psychology",
        cover_image: "https://images-na.ssl-images-amazon.com/images/I/41wI53OEpWL.jpg",
        chapters: &[
            SampleChapter {
                title: "The Two Systems",
                summary: "System 1 operates automatically and quickly, with little effort and no sense of voluntary control. System 2 allocates attention to effortful mental activities. System 1 generates impressions and feelings; System 2 turns these into beliefs and voluntary actions.",
                read_time_minutes: 6,
            },
            SampleChapter {
                title: "Attention and Effort",
                summary: "System 2 has limited capacity. Mental effort is required when focusing attention, especially when it must be sustained. The load on System 2 can be measured by pupil dilation. Cognitive effort affects behavior: people are less willing to exert self-control when System 2 is busy.",
                read_time_minutes: 5,
            },
        ],
    },
    SampleBook {
        title: "Sapiens",
        author: "Yuval Noah Harari",
        description: "A Brief History of Humankind. From the evolution of archaic human species to the present day.",
        category: "History",
        cover_image: "https://images-na.ssl-images-amazon.com/images/I/41eUYvGPakL.jpg",
        chapters: &[
            SampleChapter {
                title: "The Cognitive Revolution",
                summary: "About 70,000 years ago, Homo sapiens developed unique cognitive abilities through the Cognitive Revolution. This gave humans the ability to think about things that don't exist: fiction, myths, gods, and nations. This ability to create shared myths enabled unprecedented cooperation among large numbers of strangers.",
                read_time_minutes: 7,
            },
            SampleChapter {
                title: "The Agricultural Revolution",
                summary: "The Agricultural Revolution, starting around 10,000 BCE, was humanity's biggest fraud. While it increased the total amount of food available, it didn't improve individual lives. Farmers worked harder than foragers and had worse diets. The revolution created hierarchies and enabled population growth.",
                read_time_minutes: 6,
            },
        ],
    },
    SampleBook {
        title: "The Lean Startup",
        author: "Eric Ries",
        description: "How Today's Entrepreneurs Use Continuous Innovation to Create Radically Successful Businesses.",
        category: "Business",
        cover_image: "https://images-na.ssl-images-amazon.com/images/I/51Zymoq7UnL.jpg",
        chapters: &[
            SampleChapter {
                title: "Build-Measure-Learn",
                summary: "The fundamental activity of a startup is to turn ideas into products, measure customer responses, and learn whether to pivot or persevere. This Build-Measure-Learn feedback loop is at the core of the Lean Startup model. The goal is to minimize the total time through this loop.",
                read_time_minutes: 5,
            },
            SampleChapter {
                title: "Minimum Viable Product",
                summary: "The MVP is the version of a new product that allows a team to collect maximum validated learning with minimum effort. It's not about building less; it's about learning faster. The MVP helps entrepreneurs test fundamental business hypotheses and begin the learning process as quickly as possible.",
                read_time_minutes: 6,
            },
        ],
    },
    SampleBook {
        title: "Deep Work",
        author: "Cal Newport",
        description: "Rules for Focused Success in a Distracted World. Professional activities performed in a state of distraction-free concentration.",
        category: "Productivity",
        cover_image: "https://images-na.ssl-images-amazon.com/images/I/41gLi5f3Q5L.jpg",
        chapters: &[
            SampleChapter {
                title: "Deep Work is Valuable",
                summary: "Deep work is the ability to focus without distraction on cognitively demanding tasks. In our economy, three groups will thrive: those who work well with intelligent machines, those who are the best at what they do, and those with access to capital. To join the first two groups, you must master deep work.",
                read_time_minutes: 6,
            },
            SampleChapter {
                title: "Deep Work is Rare",
                summary: "Despite its value, deep work is becoming increasingly rare. Modern business culture has embraced behaviors that actively prevent deep work: open offices, instant messaging, social media. The metric black hole of knowledge work makes it difficult to prove the value of depth, leading to shallow alternatives.",
                read_time_minutes: 5,
            },
        ],
    },
];

/// Insert the sample books and their chapters into an empty catalog
///
/// Does nothing when any book already exists.
///
/// # Returns
/// The number of books inserted
pub async fn seed_sample_catalog(pool: &SqlitePool) -> Result<usize, sqlx::Error> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::debug!("Catalog has {} books, skipping sample data", existing);
        return Ok(0);
    }

    for sample in SAMPLE_BOOKS {
        let draft = BookDraft {
            title: sample.title.to_string(),
            author: sample.author.to_string(),
            description: sample.description.to_string(),
            cover_image: sample.cover_image.to_string(),
            category: sample.category.to_string(),
        };
        let book = create_book(pool, &draft, None).await?;

        for (number, chapter) in (1..).zip(sample.chapters) {
            create_chapter(
                pool,
                &ChapterDraft {
                    book_id: book.id,
                    chapter_number: number,
                    title: chapter.title.to_string(),
                    summary: chapter.summary.to_string(),
                    read_time_minutes: chapter.read_time_minutes,
                },
            )
            .await?;
        }
        tracing::info!(
            "Added sample book '{}' with {} chapters",
            book.title,
            sample.chapters.len()
        );
    }

    Ok(SAMPLE_BOOKS.len())
}

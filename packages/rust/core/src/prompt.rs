//! Prompt templates sent to the summarization service.

use coursesummary_shared::{TextBlock, ViewKind};

/// Instruction placed before the text of a selected lesson.
pub const LESSON_INSTRUCTIONS: &str = "Given the following lesson content, return:\n\
1. The topics covered in the lesson.\n\
2. The things that need to be completed (and when, if applicable).\n\
Format your response clearly.\n\n\
Lesson Content:\n";

/// Instruction placed before the text of a course overview.
pub const COURSE_INSTRUCTIONS: &str =
    "Please provide a concise summary of the following course content:\n\n";

/// The prompt for `text` extracted from a view of kind `view`.
pub fn prompt_for(view: ViewKind, text: &str) -> String {
    let instructions = match view {
        ViewKind::SingleItem => LESSON_INSTRUCTIONS,
        ViewKind::CollectionOverview => COURSE_INSTRUCTIONS,
    };
    format!("{instructions}{text}")
}

/// The prompt embedding a rendered [`TextBlock`].
pub fn build_prompt(block: &TextBlock) -> String {
    prompt_for(block.view, &block.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursesummary_shared::SegmentKind;

    #[test]
    fn lesson_prompt_text() {
        let mut block = TextBlock::new(ViewKind::SingleItem);
        block.push(SegmentKind::Title, "Lesson: Week 3");
        assert_eq!(
            build_prompt(&block),
            "Given the following lesson content, return:\n\
             1. The topics covered in the lesson.\n\
             2. The things that need to be completed (and when, if applicable).\n\
             Format your response clearly.\n\n\
             Lesson Content:\nLesson: Week 3"
        );
    }

    #[test]
    fn course_prompt_text() {
        assert_eq!(
            prompt_for(ViewKind::CollectionOverview, "Course: Biology"),
            "Please provide a concise summary of the following course content:\n\nCourse: Biology"
        );
    }
}

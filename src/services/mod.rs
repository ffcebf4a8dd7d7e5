pub mod story_tracker;

pub use story_tracker::StoryTrackerService;

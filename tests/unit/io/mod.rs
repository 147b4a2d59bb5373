mod image;
mod progress;

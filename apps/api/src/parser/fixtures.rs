/// Synthetic resume shared by parser and endpoint tests.
pub const SAMPLE_RESUME: &str = "\
Jane Doe
jane.doe@example.com | (555) 123-4567

Summary
Backend engineer focused on Python services and data pipelines.
Comfortable with Docker and AWS.

Experience
Senior Software Engineer
Acme Technologies
Jan 2020 - Present

Education
Stanford University 2014-2018
Bachelor of Science in Computer Science
GPA: 3.8/4.0

Skills
Python, SQL, Docker, AWS, Git
";

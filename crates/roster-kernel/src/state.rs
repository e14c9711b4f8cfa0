//! Kernel state management.
//!
//! The kernel maintains the authoritative in-memory record set: every
//! course, every student with their enrollments, and the cache of computed
//! aggregate grades. State transitions are done by taking ownership and
//! returning a new state (builder pattern).

use std::collections::BTreeMap;

use roster_types::{Aggregate, Capacity, CourseId, Grade, GradeState, StudentId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Records
// ============================================================================

/// A course offered for enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: CourseId,
    pub name: String,
    pub capacity: Capacity,
    /// Students currently enrolled in this course. Never exceeds `capacity`.
    pub enrolled: u32,
}

impl Course {
    pub fn new(course_id: CourseId, name: impl Into<String>, capacity: Capacity) -> Self {
        Self {
            course_id,
            name: name.into(),
            capacity,
            enrolled: 0,
        }
    }

    /// Returns true once the course has no free seats.
    pub fn is_full(&self) -> bool {
        self.enrolled >= self.capacity.as_u32()
    }
}

/// A registered student and the courses they are enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: StudentId,
    pub name: String,
    /// Course code -> grade state. One entry per enrollment.
    pub enrollments: BTreeMap<CourseId, GradeState>,
}

impl Student {
    pub fn new(student_id: StudentId, name: impl Into<String>) -> Self {
        Self {
            student_id,
            name: name.into(),
            enrollments: BTreeMap::new(),
        }
    }

    pub fn is_enrolled(&self, course_id: &CourseId) -> bool {
        self.enrollments.contains_key(course_id)
    }

    /// Returns the grade state for a course, if enrolled.
    pub fn grade_state(&self, course_id: &CourseId) -> Option<GradeState> {
        self.enrollments.get(course_id).copied()
    }

    /// Computes the aggregate over this student's current grades.
    pub fn aggregate(&self) -> Aggregate {
        Aggregate::from_states(self.enrollments.values())
    }
}

// ============================================================================
// Kernel State
// ============================================================================

/// The kernel's in-memory state (the entity store).
///
/// State uses a builder pattern - methods take ownership of `self`, mutate,
/// and return `self`. Mutators are crate-private: external code goes through
/// [`crate::kernel::apply_committed`], which validates first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    courses: BTreeMap<CourseId, Course>,

    students: BTreeMap<StudentId, Student>,
    next_student_id: StudentId,

    // Last computed aggregate per student, refreshed by `ComputeAggregate`
    aggregates: BTreeMap<StudentId, Aggregate>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            courses: BTreeMap::new(),
            students: BTreeMap::new(),
            next_student_id: StudentId::new(1),
            aggregates: BTreeMap::new(),
        }
    }
}

impl State {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Course Management
    // ========================================================================

    /// Returns the course with the given code, if it exists.
    pub fn get_course(&self, id: &CourseId) -> Option<&Course> {
        self.courses.get(id)
    }

    /// Returns true if a course with the given code exists.
    pub fn course_exists(&self, id: &CourseId) -> bool {
        self.courses.contains_key(id)
    }

    /// Returns a reference to all courses, ordered by code.
    pub fn courses(&self) -> &BTreeMap<CourseId, Course> {
        &self.courses
    }

    /// Sum of enrollment counters across all courses.
    pub fn total_enrollments(&self) -> u64 {
        self.courses.values().map(|c| u64::from(c.enrolled)).sum()
    }

    /// Adds a course and returns the updated state.
    pub(crate) fn with_course(mut self, course: Course) -> Self {
        self.courses.insert(course.course_id.clone(), course);
        self
    }

    /// Replaces a course's display fields and returns the updated state.
    ///
    /// If the course doesn't exist, returns self unchanged.
    pub(crate) fn with_course_details(
        mut self,
        id: &CourseId,
        name: String,
        capacity: Capacity,
    ) -> Self {
        if let Some(course) = self.courses.get_mut(id) {
            course.name = name;
            course.capacity = capacity;
        }
        self
    }

    // ========================================================================
    // Student Management
    // ========================================================================

    /// Returns the student with the given ID, if it exists.
    pub fn get_student(&self, id: &StudentId) -> Option<&Student> {
        self.students.get(id)
    }

    /// Returns true if a student with the given ID exists.
    pub fn student_exists(&self, id: &StudentId) -> bool {
        self.students.contains_key(id)
    }

    /// Returns a reference to all students, ordered by ID.
    pub fn students(&self) -> &BTreeMap<StudentId, Student> {
        &self.students
    }

    /// Returns the number of students.
    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Returns the next student ID that will be allocated.
    pub fn next_student_id(&self) -> StudentId {
        self.next_student_id
    }

    /// Creates a new student with an auto-allocated ID.
    ///
    /// ID allocation and insertion happen together, so an ID is never
    /// handed out without a matching record.
    pub(crate) fn with_new_student(mut self, name: String) -> (Self, Student) {
        let student_id = self.next_student_id;
        self.next_student_id = student_id.next();

        let student = Student::new(student_id, name);
        self.students.insert(student_id, student.clone());

        (self, student)
    }

    /// Renames a student and returns the updated state.
    ///
    /// If the student doesn't exist, returns self unchanged.
    pub(crate) fn with_student_name(mut self, id: &StudentId, name: String) -> Self {
        if let Some(student) = self.students.get_mut(id) {
            student.name = name;
        }
        self
    }

    // ========================================================================
    // Enrollment & Grades
    // ========================================================================

    /// Records a pending enrollment and bumps the course counter.
    ///
    /// Both halves of the relation change together. Callers must have
    /// checked existence, duplicates and capacity.
    pub(crate) fn with_enrollment(mut self, student_id: &StudentId, course_id: &CourseId) -> Self {
        if let (Some(student), Some(course)) = (
            self.students.get_mut(student_id),
            self.courses.get_mut(course_id),
        ) {
            student
                .enrollments
                .insert(course_id.clone(), GradeState::Pending);
            course.enrolled += 1;
        }
        self
    }

    /// Sets the grade of an existing enrollment.
    ///
    /// If the enrollment doesn't exist, returns self unchanged.
    pub(crate) fn with_grade(
        mut self,
        student_id: &StudentId,
        course_id: &CourseId,
        grade: Grade,
    ) -> Self {
        if let Some(state) = self
            .students
            .get_mut(student_id)
            .and_then(|s| s.enrollments.get_mut(course_id))
        {
            *state = GradeState::Assigned(grade);
        }
        self
    }

    // ========================================================================
    // Aggregate Cache
    // ========================================================================

    /// Returns the last computed aggregate for a student, if any.
    pub fn cached_aggregate(&self, id: &StudentId) -> Option<Aggregate> {
        self.aggregates.get(id).copied()
    }

    pub(crate) fn with_aggregate(mut self, id: StudentId, aggregate: Aggregate) -> Self {
        self.aggregates.insert(id, aggregate);
        self
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Checks the cross-entity invariants of the store.
    ///
    /// - every course's counter is within its capacity
    /// - every enrollment references an existing course
    /// - every course's counter equals the number of students enrolled in it
    pub fn check_invariants(&self) -> bool {
        let within_capacity = self
            .courses
            .values()
            .all(|c| c.enrolled <= c.capacity.as_u32());

        let references_exist = self
            .students
            .values()
            .flat_map(|s| s.enrollments.keys())
            .all(|course_id| self.courses.contains_key(course_id));

        let counters_match = self.courses.values().all(|c| {
            let actual = self
                .students
                .values()
                .filter(|s| s.is_enrolled(&c.course_id))
                .count();
            actual == c.enrolled as usize
        });

        within_capacity && references_exist && counters_match
    }
}

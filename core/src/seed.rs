//! Catalogue and templates a fresh install starts with.

use crate::models::{LibraryExercise, TemplateExercise, WorkoutTemplate};

const EXERCISES: &[(&str, &str, &str, &str)] = &[
    ("bench_press", "Bench Press", "Chest", "Barbell"),
    ("incline_bench", "Incline Bench Press", "Chest", "Barbell"),
    ("db_press", "Dumbbell Press", "Chest", "Dumbbells"),
    ("chest_fly", "Chest Fly", "Chest", "Cable/Dumbbells"),
    ("pull_up", "Pull-Up", "Back", "Bodyweight"),
    ("lat_pulldown", "Lat Pulldown", "Back", "Machine"),
    ("barbell_row", "Barbell Row", "Back", "Barbell"),
    ("db_row", "Dumbbell Row", "Back", "Dumbbells"),
    ("face_pull", "Face Pull", "Back/Shoulders", "Cable"),
    ("squat", "Back Squat", "Legs", "Barbell"),
    ("front_squat", "Front Squat", "Legs", "Barbell"),
    ("leg_press", "Leg Press", "Legs", "Machine"),
    ("rdl", "Romanian Deadlift", "Legs", "Barbell"),
    ("lunge", "Lunge", "Legs", "Dumbbells"),
    ("ohp", "Overhead Press", "Shoulders", "Barbell"),
    (
        "db_shoulder_press",
        "Dumbbell Shoulder Press",
        "Shoulders",
        "Dumbbells",
    ),
    ("lat_raise", "Lateral Raise", "Shoulders", "Dumbbells"),
    ("rear_delt_fly", "Rear Delt Fly", "Shoulders", "Dumbbells"),
    ("bb_curl", "Barbell Curl", "Arms", "Barbell"),
    ("db_curl", "Dumbbell Curl", "Arms", "Dumbbells"),
    ("hammer_curl", "Hammer Curl", "Arms", "Dumbbells"),
    ("tricep_pushdown", "Tricep Pushdown", "Arms", "Cable"),
    ("skullcrusher", "Skull Crushers", "Arms", "EZ Bar"),
    ("plank", "Plank", "Core", "Bodyweight"),
    (
        "hanging_leg_raise",
        "Hanging Leg Raise",
        "Core",
        "Bodyweight",
    ),
    ("cable_crunch", "Cable Crunch", "Core", "Cable"),
    ("run", "Run", "Cardio", ""),
    ("bike", "Bike", "Cardio", ""),
    ("row", "Row", "Cardio", ""),
    ("walk", "Walk", "Cardio", ""),
    ("stairmaster", "Stairmaster", "Cardio", ""),
];

const TEMPLATES: &[(&str, &str, &[&str])] = &[
    (
        "full_body_a",
        "Full Body A",
        &[
            "squat",
            "bench_press",
            "lat_pulldown",
            "bb_curl",
            "tricep_pushdown",
        ],
    ),
    (
        "full_body_b",
        "Full Body B",
        &["rdl", "ohp", "barbell_row", "lat_raise", "hammer_curl"],
    ),
];

#[must_use]
pub fn exercises() -> Vec<LibraryExercise> {
    EXERCISES
        .iter()
        .map(|(id, name, muscle, equipment)| LibraryExercise {
            id: (*id).to_string(),
            name: (*name).to_string(),
            muscle_group: (*muscle).to_string(),
            equipment: (*equipment).to_string(),
        })
        .collect()
}

#[must_use]
pub fn templates() -> Vec<WorkoutTemplate> {
    let catalogue = exercises();
    TEMPLATES
        .iter()
        .map(|(id, name, exercise_ids)| WorkoutTemplate {
            id: (*id).to_string(),
            name: (*name).to_string(),
            exercises: exercise_ids
                .iter()
                .filter_map(|eid| catalogue.iter().find(|e| e.id == *eid))
                .map(|e| TemplateExercise {
                    name: e.name.clone(),
                    muscle_group: e.muscle_group.clone(),
                    sets: None,
                    reps: None,
                    weight: None,
                    notes: String::new(),
                })
                .collect(),
        })
        .collect()
}

//! Common test utilities for survey-io tests

#![allow(dead_code)]

/// A small raw survey export with missing cells and a text column
pub const SURVEY_CSV: &str = "\
Respondent,WiFi_Speed_Score,Residence,Productivity_Influence_Score
1,1,Hostel,2
2,1,Home,1
3,1,Hostel,NA
4,2,Home,3
5,2,Hostel,4
6,2,,3
7,3,Home,5
8,3,Hostel,4
9,NaN,Home,5
10,3,Hostel,5
";

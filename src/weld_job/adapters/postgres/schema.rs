//! Diesel schema for weld job persistence.

diesel::table! {
    /// Weld job records, one row per job attempt on a device.
    weld_details (sequence_id) {
        /// Store-assigned identity.
        sequence_id -> Int4,
        /// Five-letter business identifier.
        #[max_length = 5]
        business_id -> Nullable<Bpchar>,
        /// Descriptive device label.
        #[max_length = 50]
        device_name -> Nullable<Varchar>,
        /// Producing device.
        #[max_length = 50]
        device_id -> Varchar,
        /// Contractor performing the weld.
        #[max_length = 100]
        contractor_name -> Nullable<Varchar>,
        /// Hull block number.
        #[max_length = 50]
        block_number -> Nullable<Varchar>,
        /// Welder performing the job.
        #[max_length = 100]
        welder_name -> Nullable<Varchar>,
        /// Welder badge number.
        #[max_length = 50]
        badge_number -> Nullable<Varchar>,
        /// Base material.
        #[max_length = 100]
        material_type -> Nullable<Varchar>,
        /// Plate thickness.
        thickness -> Nullable<Int4>,
        /// Weld type code.
        #[max_length = 10]
        type_of_weld -> Nullable<Varchar>,
        /// Number of passes.
        no_of_passes -> Nullable<Int4>,
        /// Weld length.
        weld_length -> Nullable<Int4>,
        /// Welding current.
        current -> Nullable<Int4>,
        /// Arc voltage.
        voltage -> Nullable<Int4>,
        /// Travel speed.
        travel_speed -> Nullable<Int4>,
        /// Filler wire or electrode.
        #[max_length = 100]
        filler_material -> Nullable<Varchar>,
        /// Welding procedure specification code.
        #[max_length = 100]
        wps_code -> Nullable<Varchar>,
        /// Free-text remarks.
        remarks -> Nullable<Text>,
        /// `YES` or `NO`.
        #[max_length = 3]
        completion_flag -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
